//! Conversion requests, outcomes and price normalization.

use bestrate_common::{Currency, LastPrice, MarketId};
use serde::{Deserialize, Serialize};

use crate::error::{FxError, FxResult};

/// Request to convert an amount of one asset into another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRequest {
    /// Asset being converted.
    pub origin: Currency,
    /// Asset to receive.
    pub destination: Currency,
    /// Amount of `origin`. Expected to be positive.
    pub amount: f64,
}

impl ConversionRequest {
    /// Create a new conversion request.
    pub fn new(origin: Currency, destination: Currency, amount: f64) -> Self {
        Self {
            origin,
            destination,
            amount,
        }
    }

    /// Same pair with a different amount.
    pub fn with_amount(&self, amount: f64) -> Self {
        Self {
            amount,
            ..self.clone()
        }
    }

}

/// Outcome of resolving a conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resolution {
    /// A direct or inverse market connects origin and destination.
    Direct { amount: f64 },
    /// Best path goes through one intermediary asset.
    Bridged { amount: f64, intermediary: Currency },
    /// No direct market and no complete single-hop path.
    NoPath,
}

impl Resolution {
    /// Converted amount, absent when no path was found.
    pub fn amount(&self) -> Option<f64> {
        match self {
            Resolution::Direct { amount } | Resolution::Bridged { amount, .. } => Some(*amount),
            Resolution::NoPath => None,
        }
    }

    /// Intermediary asset, present only for bridged conversions.
    pub fn intermediary(&self) -> Option<&Currency> {
        match self {
            Resolution::Bridged { intermediary, .. } => Some(intermediary),
            _ => None,
        }
    }
}

/// Apply a price to an amount.
///
/// When the price is denominated in `reference` the amount is multiplied,
/// otherwise it is divided.
pub fn normalize(price: f64, unit: &Currency, amount: f64, reference: &Currency) -> f64 {
    if unit == reference {
        amount * price
    } else {
        amount / price
    }
}

/// Parse a ticker's price and apply it to `amount` toward `reference`.
///
/// Fails if the result no longer fits in an `f64`.
pub fn convert_at(
    market: &MarketId,
    last_price: &LastPrice,
    amount: f64,
    reference: &Currency,
) -> FxResult<f64> {
    let price = last_price.value(market)?;
    let converted = normalize(price, &last_price.unit, amount, reference);
    if !converted.is_finite() {
        return Err(FxError::AmountOverflow {
            market: market.clone(),
        });
    }
    Ok(converted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_multiplies_toward_unit() {
        let out = normalize(1.6, &Currency::cop(), 2.5, &Currency::cop());
        assert_eq!(out, 2.5 * 1.6);
    }

    #[test]
    fn test_normalize_divides_otherwise() {
        let out = normalize(2421284.0, &Currency::clp(), 1000.0, &Currency::eth());
        assert_eq!(out, 1000.0 / 2421284.0);
    }

    #[test]
    fn test_convert_at_parses_price_text() {
        let market = MarketId::parse("ETH-COP").unwrap();
        let price = LastPrice::new("10600000.0", Currency::cop());

        let out = convert_at(&market, &price, 2.0, &Currency::cop()).unwrap();

        assert_eq!(out, 21_200_000.0);
    }

    #[test]
    fn test_convert_at_rejects_bad_price() {
        let market = MarketId::parse("ETH-COP").unwrap();
        let price = LastPrice::new("0", Currency::cop());

        let result = convert_at(&market, &price, 2.0, &Currency::cop());

        assert!(matches!(result, Err(FxError::InvalidPrice { .. })));
    }

    #[test]
    fn test_convert_at_rejects_overflow() {
        let market = MarketId::parse("ETH-COP").unwrap();
        let price = LastPrice::new("10600000.0", Currency::cop());

        let result = convert_at(&market, &price, 1e308, &Currency::cop());

        assert_eq!(result, Err(FxError::AmountOverflow { market }));
    }

    #[test]
    fn test_resolution_accessors() {
        let direct = Resolution::Direct { amount: 2.5 };
        assert_eq!(direct.amount(), Some(2.5));
        assert!(direct.intermediary().is_none());

        let bridged = Resolution::Bridged {
            amount: 4.0,
            intermediary: Currency::pen(),
        };
        assert_eq!(bridged.amount(), Some(4.0));
        assert_eq!(bridged.intermediary(), Some(&Currency::pen()));

        assert_eq!(Resolution::NoPath.amount(), None);
        assert!(Resolution::NoPath.intermediary().is_none());
    }

    #[test]
    fn test_with_amount_keeps_pair() {
        let request = ConversionRequest::new(Currency::clp(), Currency::cop(), 1000.0);
        let scaled = request.with_amount(5000.0);

        assert_eq!(scaled.origin, Currency::clp());
        assert_eq!(scaled.destination, Currency::cop());
        assert_eq!(scaled.amount, 5000.0);
    }
}
