//! Per-request index of markets in a ticker snapshot.

use std::collections::HashMap;

use bestrate_common::{Currency, LastPrice, MarketId, Ticker};

/// Markets of one snapshot, keyed by market id.
///
/// Iteration follows the order in which each market id first appeared in the
/// snapshot. A repeated id replaces the earlier price in place.
#[derive(Debug, Clone, Default)]
pub struct MarketIndex {
    entries: Vec<(MarketId, LastPrice)>,
    positions: HashMap<MarketId, usize>,
}

impl MarketIndex {
    /// Index a sequence of tickers.
    pub fn build<'a>(tickers: impl IntoIterator<Item = &'a Ticker>) -> Self {
        let mut index = Self::default();
        for ticker in tickers {
            index.insert(ticker.market_id.clone(), ticker.last_price.clone());
        }
        index
    }

    fn insert(&mut self, market: MarketId, price: LastPrice) {
        match self.positions.get(&market) {
            Some(&pos) => self.entries[pos].1 = price,
            None => {
                self.positions.insert(market.clone(), self.entries.len());
                self.entries.push((market, price));
            }
        }
    }

    /// Look up a market by id.
    pub fn get(&self, market: &MarketId) -> Option<&LastPrice> {
        self.positions.get(market).map(|&pos| &self.entries[pos].1)
    }

    /// Look up the `base-quote` market.
    pub fn pair(&self, base: &Currency, quote: &Currency) -> Option<(MarketId, &LastPrice)> {
        let market = MarketId::new(base.clone(), quote.clone());
        let price = self.get(&market)?;
        Some((market, price))
    }

    /// Iterate markets in snapshot order.
    pub fn iter(&self) -> impl Iterator<Item = (&MarketId, &LastPrice)> {
        self.entries.iter().map(|(market, price)| (market, price))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
