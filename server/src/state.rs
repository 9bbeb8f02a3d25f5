//! Shared application state.

use std::sync::Arc;

use bestrate_common::Currency;
use bestrate_fx::{FxEngine, FxEngineConfig, FxResult, HttpTickerSource, TickerSource};

use crate::config::ServerConfig;

/// State handed to every request handler. Holds no per-request data.
pub struct AppState {
    pub engine: FxEngine,
    pub supported_currencies: Vec<Currency>,
}

impl AppState {
    /// Build state around an arbitrary ticker source.
    pub fn new(
        source: Arc<dyn TickerSource>,
        config: &ServerConfig,
    ) -> Arc<Self> {
        let engine = FxEngine::new(
            source,
            FxEngineConfig {
                strategy: config.strategy,
            },
        );
        Arc::new(Self {
            engine,
            supported_currencies: config.supported_currencies.clone(),
        })
    }

    /// Build state fetching tickers over HTTP as configured.
    pub fn from_config(config: &ServerConfig) -> FxResult<Arc<Self>> {
        let source = HttpTickerSource::new(config.tickers_url.clone(), config.fetch_timeout)?;
        Ok(Self::new(Arc::new(source), config))
    }

    pub fn is_supported(&self, currency: &Currency) -> bool {
        self.supported_currencies.contains(currency)
    }
}
