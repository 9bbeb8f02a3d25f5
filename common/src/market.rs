//! Exchange markets and their ticker records.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::currency::Currency;
use crate::error::{MarketDataError, Result};

/// Identifier of a tradable pair, written `BASE-QUOTE` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MarketId {
    /// Asset being bought or sold.
    pub base: Currency,
    /// Asset the market is quoted against.
    pub quote: Currency,
}

impl MarketId {
    /// Create a market id from its two legs.
    pub fn new(base: Currency, quote: Currency) -> Self {
        Self { base, quote }
    }

    /// Parse a `BASE-QUOTE` market id.
    pub fn parse(s: &str) -> Result<Self> {
        match s.split_once('-') {
            Some((base, quote))
                if !base.is_empty() && !quote.is_empty() && !quote.contains('-') =>
            {
                Ok(Self::new(Currency::new(base), Currency::new(quote)))
            }
            _ => Err(MarketDataError::MalformedMarketId(s.to_string())),
        }
    }

    /// The same pair with legs swapped.
    pub fn inverse(&self) -> Self {
        Self {
            base: self.quote.clone(),
            quote: self.base.clone(),
        }
    }

    /// Whether `currency` is one of the two legs.
    pub fn has_leg(&self, currency: &Currency) -> bool {
        self.base == *currency || self.quote == *currency
    }

    /// The leg opposite to `currency`, if `currency` trades in this market.
    pub fn counterpart(&self, currency: &Currency) -> Option<&Currency> {
        if self.base == *currency {
            Some(&self.quote)
        } else if self.quote == *currency {
            Some(&self.base)
        } else {
            None
        }
    }
}

impl fmt::Display for MarketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.base, self.quote)
    }
}

impl FromStr for MarketId {
    type Err = MarketDataError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for MarketId {
    type Error = MarketDataError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<MarketId> for String {
    fn from(id: MarketId) -> Self {
        id.to_string()
    }
}

/// Last traded price of a market, as `[price, unit]` on the wire.
///
/// The price is kept as the exchange's decimal text and only parsed when a
/// conversion actually uses it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, Currency)", into = "(String, Currency)")]
pub struct LastPrice {
    /// Decimal price text.
    pub raw: String,
    /// Asset the price is denominated in.
    pub unit: Currency,
}

impl LastPrice {
    /// Create a last price from its text and unit.
    pub fn new(raw: impl Into<String>, unit: Currency) -> Self {
        Self {
            raw: raw.into(),
            unit,
        }
    }

    /// Parse the price. Rejects non-numeric, non-finite and non-positive values.
    pub fn value(&self, market: &MarketId) -> Result<f64> {
        match self.raw.trim().parse::<f64>() {
            Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
            _ => Err(MarketDataError::InvalidPrice {
                market: market.to_string(),
                raw: self.raw.clone(),
            }),
        }
    }

    /// Whether the price is denominated in `currency`.
    pub fn is_quoted_in(&self, currency: &Currency) -> bool {
        self.unit == *currency
    }
}

impl From<(String, Currency)> for LastPrice {
    fn from((raw, unit): (String, Currency)) -> Self {
        Self { raw, unit }
    }
}

impl From<LastPrice> for (String, Currency) {
    fn from(price: LastPrice) -> Self {
        (price.raw, price.unit)
    }
}

/// Snapshot record of one market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticker {
    pub market_id: MarketId,
    pub last_price: LastPrice,
}

impl Ticker {
    /// Create a ticker.
    pub fn new(market_id: MarketId, last_price: LastPrice) -> Self {
        Self {
            market_id,
            last_price,
        }
    }

    /// Build a ticker from its wire strings.
    pub fn parse(market_id: &str, price: &str, unit: &str) -> Result<Self> {
        Ok(Self::new(
            MarketId::parse(market_id)?,
            LastPrice::new(price, Currency::new(unit)),
        ))
    }
}
