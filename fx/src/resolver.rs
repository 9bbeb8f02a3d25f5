//! Best-rate resolution over a ticker snapshot.
//!
//! A conversion is resolved in two stages. A direct (`origin-destination`) or
//! inverse (`destination-origin`) market is used whenever one exists, even if
//! a bridged path would pay more. Otherwise every single-hop path
//! `origin -> intermediary -> destination` allowed by the [`BridgeStrategy`]
//! is priced and the one yielding the largest amount wins. Ties keep the
//! intermediary seen first in snapshot order.

use std::fmt;
use std::str::FromStr;

use bestrate_common::{Currency, LastPrice, MarketId, TickerSnapshot};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::conversion::{convert_at, ConversionRequest, Resolution};
use crate::error::{FxError, FxResult};
use crate::index::MarketIndex;

/// Which markets may serve as legs of a bridged conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BridgeStrategy {
    /// Any market containing the origin is a first leg and any market between
    /// the intermediary and the destination is a second leg, in either
    /// orientation. Direction is taken from each price's unit.
    Symmetric,
    /// Buy an intermediary with the origin, then sell it for the destination.
    /// First legs must be `I-origin` priced in the origin and second legs must
    /// be `I-destination` priced in the destination.
    #[default]
    Directional,
}

impl fmt::Display for BridgeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeStrategy::Symmetric => write!(f, "symmetric"),
            BridgeStrategy::Directional => write!(f, "directional"),
        }
    }
}

impl FromStr for BridgeStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "symmetric" => Ok(BridgeStrategy::Symmetric),
            "directional" => Ok(BridgeStrategy::Directional),
            other => Err(format!("Unknown bridge strategy: {}", other)),
        }
    }
}

/// Running maximum over candidate paths.
#[derive(Debug, Default)]
struct BestPath {
    best: Option<(Currency, f64)>,
}

impl BestPath {
    /// Replace the current best only on strict improvement.
    fn offer(&mut self, intermediary: &Currency, amount: f64) {
        let improves = match &self.best {
            Some((_, current)) => amount > *current,
            None => true,
        };
        if improves {
            self.best = Some((intermediary.clone(), amount));
        }
    }

    fn into_resolution(self) -> Resolution {
        match self.best {
            Some((intermediary, amount)) => Resolution::Bridged {
                amount,
                intermediary,
            },
            None => Resolution::NoPath,
        }
    }
}

/// Stateless resolver. Each call indexes the snapshot it is given.
#[derive(Debug, Clone, Copy, Default)]
pub struct RateResolver {
    strategy: BridgeStrategy,
}

impl RateResolver {
    /// Create a resolver using the given bridge strategy.
    pub fn new(strategy: BridgeStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> BridgeStrategy {
        self.strategy
    }

    /// Resolve the best conversion for `request` against `snapshot`.
    pub fn resolve(
        &self,
        request: &ConversionRequest,
        snapshot: &TickerSnapshot,
    ) -> FxResult<Resolution> {
        let index = MarketIndex::build(&snapshot.tickers);
        self.resolve_in(request, &index)
    }

    /// Resolve against an already built index.
    pub fn resolve_in(
        &self,
        request: &ConversionRequest,
        index: &MarketIndex,
    ) -> FxResult<Resolution> {
        if let Some(amount) = direct_conversion(request, index)? {
            debug!(amount, "Resolved through direct market");
            return Ok(Resolution::Direct { amount });
        }

        let mut best = BestPath::default();
        match self.strategy {
            BridgeStrategy::Directional => bridge_directional(request, index, &mut best)?,
            BridgeStrategy::Symmetric => bridge_symmetric(request, index, &mut best)?,
        }

        let resolution = best.into_resolution();
        match &resolution {
            Resolution::Bridged {
                amount,
                intermediary,
            } => debug!(amount, intermediary = %intermediary, "Resolved through intermediary"),
            _ => debug!(strategy = %self.strategy, "No conversion path"),
        }
        Ok(resolution)
    }
}

/// Convert through `origin-destination`, falling back to `destination-origin`.
///
/// The origin is the reference leg: a price quoted in the origin multiplies
/// the amount, any other unit divides it.
fn direct_conversion(request: &ConversionRequest, index: &MarketIndex) -> FxResult<Option<f64>> {
    let origin = &request.origin;
    let destination = &request.destination;

    let Some((market, price)) = index
        .pair(origin, destination)
        .or_else(|| index.pair(destination, origin))
    else {
        return Ok(None);
    };

    ensure_unit_is_leg(&market, price)?;
    convert_at(&market, price, request.amount, origin).map(Some)
}

fn bridge_directional(
    request: &ConversionRequest,
    index: &MarketIndex,
    best: &mut BestPath,
) -> FxResult<()> {
    let origin = &request.origin;
    let destination = &request.destination;

    for (market, first) in index.iter() {
        if market.quote != *origin {
            continue;
        }
        if !first.is_quoted_in(origin) {
            return Err(FxError::unit_mismatch(market, &first.unit, origin));
        }

        let intermediary = &market.base;
        let held = convert_at(market, first, request.amount, intermediary)?;

        let Some((exit, second)) = index.pair(intermediary, destination) else {
            trace!(intermediary = %intermediary, "No market toward destination");
            continue;
        };
        if !second.is_quoted_in(destination) {
            return Err(FxError::unit_mismatch(&exit, &second.unit, destination));
        }

        let amount = convert_at(&exit, second, held, destination)?;
        trace!(intermediary = %intermediary, amount, "Candidate path");
        best.offer(intermediary, amount);
    }

    Ok(())
}

fn bridge_symmetric(
    request: &ConversionRequest,
    index: &MarketIndex,
    best: &mut BestPath,
) -> FxResult<()> {
    let origin = &request.origin;
    let destination = &request.destination;

    for (market, first) in index.iter() {
        let Some(intermediary) = market.counterpart(origin) else {
            continue;
        };
        ensure_unit_is_leg(market, first)?;
        let held = convert_at(market, first, request.amount, intermediary)?;

        let Some((exit, second)) = index
            .pair(intermediary, destination)
            .or_else(|| index.pair(destination, intermediary))
        else {
            trace!(intermediary = %intermediary, "No market toward destination");
            continue;
        };
        ensure_unit_is_leg(&exit, second)?;

        let amount = convert_at(&exit, second, held, destination)?;
        trace!(intermediary = %intermediary, amount, "Candidate path");
        best.offer(intermediary, amount);
    }

    Ok(())
}

fn ensure_unit_is_leg(market: &MarketId, price: &LastPrice) -> FxResult<()> {
    if market.has_leg(&price.unit) {
        Ok(())
    } else {
        Err(FxError::unit_not_a_leg(market, &price.unit))
    }
}
