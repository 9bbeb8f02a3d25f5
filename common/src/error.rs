//! Error types for market data parsing.

use thiserror::Error;

/// Errors raised while reading exchange market data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketDataError {
    /// Market id is not of the form `BASE-QUOTE`.
    #[error("Malformed market id: {0}")]
    MalformedMarketId(String),

    /// Price text is not a finite, positive decimal number.
    #[error("Invalid price {raw:?} for market {market}")]
    InvalidPrice { market: String, raw: String },

    /// Snapshot payload could not be decoded.
    #[error("Invalid snapshot payload: {0}")]
    InvalidPayload(String),
}

/// Result type alias for market data operations.
pub type Result<T> = std::result::Result<T, MarketDataError>;
