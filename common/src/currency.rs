//! Currency and asset symbols.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Asset symbol as published by the exchange (`CLP`, `BTC`, ...).
///
/// Symbols are case-sensitive: `clp` and `CLP` are different assets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Currency(String);

impl Currency {
    /// Create a new currency from its symbol.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Get the currency symbol.
    pub fn code(&self) -> &str {
        &self.0
    }

    pub fn clp() -> Self {
        Self::new("CLP")
    }

    pub fn pen() -> Self {
        Self::new("PEN")
    }

    pub fn cop() -> Self {
        Self::new("COP")
    }

    pub fn btc() -> Self {
        Self::new("BTC")
    }

    pub fn eth() -> Self {
        Self::new("ETH")
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Currency {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Currency {
    fn from(s: String) -> Self {
        Self(s)
    }
}
