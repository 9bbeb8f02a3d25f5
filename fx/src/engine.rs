//! Main FX engine implementation.

use std::sync::Arc;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::conversion::{ConversionRequest, Resolution};
use crate::error::FxResult;
use crate::provider::TickerSource;
use crate::resolver::{BridgeStrategy, RateResolver};

/// Configuration for the FX engine.
#[derive(Debug, Clone, Default)]
pub struct FxEngineConfig {
    /// Which markets may bridge a conversion.
    pub strategy: BridgeStrategy,
}

/// Fetches a snapshot per request and resolves the best conversion against it.
pub struct FxEngine {
    source: Arc<dyn TickerSource>,
    resolver: RateResolver,
}

impl FxEngine {
    /// Create a new FX engine with the given ticker source.
    pub fn new(source: Arc<dyn TickerSource>, config: FxEngineConfig) -> Self {
        Self {
            source,
            resolver: RateResolver::new(config.strategy),
        }
    }

    pub fn strategy(&self) -> BridgeStrategy {
        self.resolver.strategy()
    }

    /// Find the best conversion using a freshly fetched snapshot.
    #[instrument(skip(self), fields(
        resolution_id = %Uuid::now_v7(),
        origin = %request.origin,
        destination = %request.destination,
        amount = request.amount,
    ))]
    pub async fn best_conversion(&self, request: &ConversionRequest) -> FxResult<Resolution> {
        let snapshot = self.source.fetch_snapshot().await.map_err(|e| {
            warn!(source = self.source.name(), error = %e, "Ticker snapshot unavailable");
            e
        })?;

        let resolution = self.resolver.resolve(request, &snapshot)?;

        info!(
            source = self.source.name(),
            tickers = snapshot.len(),
            snapshot_age_ms = snapshot.age().num_milliseconds(),
            final_amount = ?resolution.amount(),
            intermediary = ?resolution.intermediary(),
            "Conversion resolved"
        );

        Ok(resolution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FxError;
    use crate::provider::{FailingTickerSource, StaticTickerSource};
    use bestrate_common::{Currency, Ticker};

    fn setup_engine() -> (Arc<StaticTickerSource>, FxEngine) {
        let source = Arc::new(StaticTickerSource::new(vec![
            Ticker::parse("BTC-CLP", "102558064.0", "CLP").unwrap(),
            Ticker::parse("ETH-CLP", "2421284.0", "CLP").unwrap(),
            Ticker::parse("ETH-COP", "10600000.0", "COP").unwrap(),
        ]));
        let engine = FxEngine::new(source.clone(), FxEngineConfig::default());
        (source, engine)
    }

    #[tokio::test]
    async fn test_best_conversion() {
        let (source, engine) = setup_engine();
        let request = ConversionRequest::new(Currency::clp(), Currency::cop(), 1000.0);

        let resolution = engine.best_conversion(&request).await.unwrap();

        assert_eq!(resolution.intermediary(), Some(&Currency::eth()));
        assert_eq!(source.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_each_request_fetches_once() {
        let (source, engine) = setup_engine();
        let request = ConversionRequest::new(Currency::clp(), Currency::cop(), 1000.0);

        let first = engine.best_conversion(&request).await.unwrap();
        let second = engine.best_conversion(&request).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(source.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_no_path() {
        let (_, engine) = setup_engine();
        let request = ConversionRequest::new(Currency::new("X"), Currency::new("Y"), 1000.0);

        let resolution = engine.best_conversion(&request).await.unwrap();

        assert_eq!(resolution, Resolution::NoPath);
    }

    #[tokio::test]
    async fn test_upstream_failure_surfaces() {
        let engine = FxEngine::new(
            Arc::new(FailingTickerSource::new("API Error")),
            FxEngineConfig::default(),
        );
        let request = ConversionRequest::new(Currency::clp(), Currency::pen(), 1000.0);

        let result = engine.best_conversion(&request).await;

        assert!(matches!(result, Err(FxError::Upstream(ref msg)) if msg.contains("API Error")));
    }

    #[tokio::test]
    async fn test_symmetric_engine() {
        let source = Arc::new(StaticTickerSource::new(vec![
            Ticker::parse("CLP-PEN", "0.0025", "PEN").unwrap(),
            Ticker::parse("PEN-COP", "1.6", "COP").unwrap(),
        ]));
        let engine = FxEngine::new(
            source,
            FxEngineConfig {
                strategy: BridgeStrategy::Symmetric,
            },
        );
        let request = ConversionRequest::new(Currency::clp(), Currency::cop(), 1000.0);

        let resolution = engine.best_conversion(&request).await.unwrap();

        assert_eq!(engine.strategy(), BridgeStrategy::Symmetric);
        assert_eq!(resolution.intermediary(), Some(&Currency::pen()));
    }
}
