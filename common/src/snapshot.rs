//! Ticker snapshots as published by an exchange.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{MarketDataError, Result};
use crate::market::{LastPrice, MarketId, Ticker};

/// Full list of tickers fetched at one point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "WireSnapshot")]
pub struct TickerSnapshot {
    /// Tickers in the order the exchange listed them.
    pub tickers: Vec<Ticker>,
    /// Market ids in the payload that are not `BASE-QUOTE`. Their tickers
    /// cannot take part in any conversion and are left out of `tickers`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped_markets: Vec<String>,
    /// When the snapshot was taken. Not part of the exchange payload.
    #[serde(skip)]
    pub fetched_at: DateTime<Utc>,
}

/// Exchange payload as sent, before market ids are parsed.
#[derive(Deserialize)]
struct WireSnapshot {
    tickers: Vec<WireTicker>,
}

#[derive(Deserialize)]
struct WireTicker {
    market_id: String,
    last_price: LastPrice,
}

impl From<WireSnapshot> for TickerSnapshot {
    fn from(wire: WireSnapshot) -> Self {
        let mut tickers = Vec::with_capacity(wire.tickers.len());
        let mut skipped_markets = Vec::new();
        for WireTicker {
            market_id,
            last_price,
        } in wire.tickers
        {
            match MarketId::parse(&market_id) {
                Ok(id) => tickers.push(Ticker::new(id, last_price)),
                Err(_) => skipped_markets.push(market_id),
            }
        }

        Self {
            tickers,
            skipped_markets,
            fetched_at: Utc::now(),
        }
    }
}

impl TickerSnapshot {
    /// Create a snapshot taken now.
    pub fn new(tickers: Vec<Ticker>) -> Self {
        Self {
            tickers,
            skipped_markets: Vec::new(),
            fetched_at: Utc::now(),
        }
    }

    /// Decode an exchange payload of the form `{"tickers": [...]}`.
    ///
    /// Tickers whose market id is malformed are skipped and listed in
    /// `skipped_markets`. Any other shape error rejects the whole payload.
    pub fn from_json(payload: &str) -> Result<Self> {
        serde_json::from_str(payload).map_err(|e| MarketDataError::InvalidPayload(e.to_string()))
    }

    /// Number of tickers.
    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    /// Check if the snapshot has no tickers.
    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }

    /// Time elapsed since the snapshot was taken.
    pub fn age(&self) -> Duration {
        Utc::now().signed_duration_since(self.fetched_at)
    }
}

impl From<Vec<Ticker>> for TickerSnapshot {
    fn from(tickers: Vec<Ticker>) -> Self {
        Self::new(tickers)
    }
}
