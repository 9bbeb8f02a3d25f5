//! Server configuration.

use std::time::Duration;

use bestrate_common::Currency;
use bestrate_fx::provider::{DEFAULT_FETCH_TIMEOUT, DEFAULT_TICKERS_URL};
use bestrate_fx::BridgeStrategy;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line.
    Json,
    /// Human-readable lines.
    Text,
}

/// Main server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address.
    pub listen_addr: String,
    /// Listen port.
    pub listen_port: u16,
    /// Exchange tickers endpoint.
    pub tickers_url: String,
    /// Timeout for the ticker fetch.
    pub fetch_timeout: Duration,
    /// Which markets may bridge a conversion.
    pub strategy: BridgeStrategy,
    /// Currencies accepted as origin or destination.
    pub supported_currencies: Vec<Currency>,
    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0".to_string(),
            listen_port: 8000,
            tickers_url: DEFAULT_TICKERS_URL.to_string(),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            strategy: BridgeStrategy::Directional,
            supported_currencies: vec![Currency::clp(), Currency::pen(), Currency::cop()],
            log_format: LogFormat::Json,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    ///
    /// Unset or unparseable variables keep their default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(addr) = lookup("BESTRATE_LISTEN_ADDR") {
            config.listen_addr = addr;
        }

        if let Some(port) = lookup("BESTRATE_LISTEN_PORT") {
            if let Ok(port) = port.parse() {
                config.listen_port = port;
            }
        }

        if let Some(url) = lookup("BESTRATE_TICKERS_URL") {
            config.tickers_url = url;
        }

        if let Some(ms) = lookup("BESTRATE_FETCH_TIMEOUT_MS") {
            if let Ok(ms) = ms.parse() {
                config.fetch_timeout = Duration::from_millis(ms);
            }
        }

        if let Some(strategy) = lookup("BESTRATE_BRIDGE_STRATEGY") {
            if let Ok(strategy) = strategy.parse() {
                config.strategy = strategy;
            }
        }

        if let Some(list) = lookup("BESTRATE_SUPPORTED_CURRENCIES") {
            config.supported_currencies = list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(Currency::new)
                .collect();
        }

        if let Some(format) = lookup("BESTRATE_LOG_FORMAT") {
            config.log_format = if format.eq_ignore_ascii_case("text") {
                LogFormat::Text
            } else {
                LogFormat::Json
            };
        }

        config
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.listen_port == 0 {
            return Err("Listen port cannot be 0".to_string());
        }

        if self.tickers_url.is_empty() {
            return Err("Tickers URL cannot be empty".to_string());
        }

        if self.fetch_timeout.is_zero() {
            return Err("Fetch timeout cannot be zero".to_string());
        }

        if self.supported_currencies.is_empty() {
            return Err("At least one supported currency is required".to_string());
        }

        Ok(())
    }

    /// `addr:port` to bind.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.listen_addr, self.listen_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.strategy, BridgeStrategy::Directional);
        assert_eq!(config.supported_currencies.len(), 3);
        assert_eq!(config.bind_address(), "0.0.0.0:8000");
    }

    #[test]
    fn test_invalid_config() {
        let mut config = ServerConfig::default();
        config.listen_port = 0;
        assert!(config.validate().is_err());

        let mut config = ServerConfig::default();
        config.supported_currencies.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_lookup() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("BESTRATE_LISTEN_PORT", "9100"),
            ("BESTRATE_FETCH_TIMEOUT_MS", "2500"),
            ("BESTRATE_BRIDGE_STRATEGY", "symmetric"),
            ("BESTRATE_SUPPORTED_CURRENCIES", "CLP, USDC,,ARS"),
            ("BESTRATE_LOG_FORMAT", "TEXT"),
        ]));

        assert_eq!(config.listen_port, 9100);
        assert_eq!(config.fetch_timeout, Duration::from_millis(2500));
        assert_eq!(config.strategy, BridgeStrategy::Symmetric);
        assert_eq!(
            config.supported_currencies,
            vec![Currency::clp(), Currency::new("USDC"), Currency::new("ARS")]
        );
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_unparseable_values_keep_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("BESTRATE_LISTEN_PORT", "eighty"),
            ("BESTRATE_BRIDGE_STRATEGY", "both"),
        ]));

        assert_eq!(config.listen_port, 8000);
        assert_eq!(config.strategy, BridgeStrategy::Directional);
    }
}
