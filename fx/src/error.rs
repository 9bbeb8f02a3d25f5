//! FX resolver error types.

use bestrate_common::{Currency, MarketDataError, MarketId};
use thiserror::Error;

/// Errors that can occur while resolving a conversion.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FxError {
    /// A ticker's price unit contradicts the quoting direction the resolver relies on.
    #[error("Ticker {market} is priced in {unit}, expected {expected}")]
    DataIntegrity {
        market: MarketId,
        unit: Currency,
        expected: String,
    },

    /// A ticker's price is not a finite positive number.
    #[error("Invalid price {raw:?} for market {market}")]
    InvalidPrice { market: String, raw: String },

    /// A market id in the ticker data is not of the form `BASE-QUOTE`.
    #[error("Malformed market id: {0}")]
    MalformedMarket(String),

    /// Applying a price pushed the amount past the range of `f64`.
    #[error("Converted amount overflows at market {market}")]
    AmountOverflow { market: MarketId },

    /// The ticker source could not deliver a snapshot.
    #[error("Ticker source unavailable: {0}")]
    Upstream(String),
}

impl FxError {
    /// Price unit is neither leg of the market.
    pub fn unit_not_a_leg(market: &MarketId, unit: &Currency) -> Self {
        FxError::DataIntegrity {
            market: market.clone(),
            unit: unit.clone(),
            expected: format!("{} or {}", market.base, market.quote),
        }
    }

    /// Price unit is a leg of the market but not the one required.
    pub fn unit_mismatch(market: &MarketId, unit: &Currency, expected: &Currency) -> Self {
        FxError::DataIntegrity {
            market: market.clone(),
            unit: unit.clone(),
            expected: expected.to_string(),
        }
    }

    /// Check if retrying the request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, FxError::Upstream(_))
    }

    /// Stable error code for logs and responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            FxError::DataIntegrity { .. } => "DATA_INTEGRITY",
            FxError::InvalidPrice { .. } => "INVALID_PRICE",
            FxError::MalformedMarket(_) => "MALFORMED_MARKET",
            FxError::AmountOverflow { .. } => "AMOUNT_OVERFLOW",
            FxError::Upstream(_) => "UPSTREAM_UNAVAILABLE",
        }
    }
}

impl From<MarketDataError> for FxError {
    fn from(err: MarketDataError) -> Self {
        match err {
            MarketDataError::InvalidPrice { market, raw } => FxError::InvalidPrice { market, raw },
            MarketDataError::MalformedMarketId(id) => FxError::MalformedMarket(id),
            MarketDataError::InvalidPayload(reason) => {
                FxError::Upstream(format!("Invalid snapshot payload: {}", reason))
            }
        }
    }
}

/// Result type for FX operations.
pub type FxResult<T> = Result<T, FxError>;
