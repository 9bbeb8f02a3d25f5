//! Ticker source trait and implementations.

use std::time::Duration;

use async_trait::async_trait;
use bestrate_common::TickerSnapshot;
use reqwest::Client;
use tracing::{debug, warn};

use crate::error::{FxError, FxResult};

/// Public tickers endpoint of the Buda exchange.
pub const DEFAULT_TICKERS_URL: &str = "https://www.buda.com/api/v2/tickers";

/// Default HTTP request timeout.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Supplier of ticker snapshots.
#[async_trait]
pub trait TickerSource: Send + Sync {
    /// Get the source name.
    fn name(&self) -> &str;

    /// Fetch the current list of tickers. Called once per conversion request.
    async fn fetch_snapshot(&self) -> FxResult<TickerSnapshot>;
}

/// Fetches tickers from an exchange's public HTTP API.
pub struct HttpTickerSource {
    client: Client,
    url: String,
}

impl HttpTickerSource {
    /// Create a source for `url` whose requests give up after `timeout`.
    pub fn new(url: impl Into<String>, timeout: Duration) -> FxResult<Self> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            FxError::Upstream(format!("Failed to build HTTP client: {}", e))
        })?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl TickerSource for HttpTickerSource {
    fn name(&self) -> &str {
        "HTTP"
    }

    async fn fetch_snapshot(&self) -> FxResult<TickerSnapshot> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                warn!(url = %self.url, error = %e, "Ticker request failed");
                FxError::Upstream(e.to_string())
            })?;

        let body = response
            .text()
            .await
            .map_err(|e| FxError::Upstream(e.to_string()))?;

        let snapshot = TickerSnapshot::from_json(&body).map_err(|e| {
            warn!(url = %self.url, error = %e, "Ticker payload rejected");
            FxError::from(e)
        })?;

        if !snapshot.skipped_markets.is_empty() {
            warn!(
                url = %self.url,
                markets = ?snapshot.skipped_markets,
                "Skipped tickers with malformed market ids"
            );
        }
        debug!(url = %self.url, tickers = snapshot.len(), "Fetched ticker snapshot");
        Ok(snapshot)
    }
}

/// Ticker source serving a fixed list of tickers, for testing.
#[cfg(any(test, feature = "test-utils"))]
pub struct StaticTickerSource {
    tickers: Vec<bestrate_common::Ticker>,
    fetches: std::sync::atomic::AtomicUsize,
}

#[cfg(any(test, feature = "test-utils"))]
impl StaticTickerSource {
    /// Create a source that always returns `tickers`.
    pub fn new(tickers: Vec<bestrate_common::Ticker>) -> Self {
        Self {
            tickers,
            fetches: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Number of snapshots served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl TickerSource for StaticTickerSource {
    fn name(&self) -> &str {
        "STATIC"
    }

    async fn fetch_snapshot(&self) -> FxResult<TickerSnapshot> {
        self.fetches
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok(TickerSnapshot::new(self.tickers.clone()))
    }
}

/// Ticker source that is always unavailable, for testing.
#[cfg(any(test, feature = "test-utils"))]
pub struct FailingTickerSource {
    message: String,
}

#[cfg(any(test, feature = "test-utils"))]
impl FailingTickerSource {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl TickerSource for FailingTickerSource {
    fn name(&self) -> &str {
        "FAILING"
    }

    async fn fetch_snapshot(&self) -> FxResult<TickerSnapshot> {
        Err(FxError::Upstream(self.message.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Router};
    use bestrate_common::{Currency, Ticker};
    use tokio::net::TcpListener;

    async fn serve(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_static_source_counts_fetches() {
        let source = StaticTickerSource::new(vec![Ticker::parse("BTC-CLP", "1", "CLP").unwrap()]);

        let snapshot = source.fetch_snapshot().await.unwrap();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(source.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_failing_source() {
        let source = FailingTickerSource::new("connection refused");

        let result = source.fetch_snapshot().await;

        assert_eq!(result.unwrap_err(), FxError::Upstream("connection refused".into()));
    }

    #[tokio::test]
    async fn test_http_source_decodes_tickers() {
        let router = Router::new().route(
            "/api/v2/tickers",
            get(|| async {
                r#"{"tickers":[{"market_id":"ETH-COP","last_price":["10600000.0","COP"]}]}"#
            }),
        );
        let base = serve(router).await;
        let source =
            HttpTickerSource::new(format!("{}/api/v2/tickers", base), DEFAULT_FETCH_TIMEOUT)
                .unwrap();

        let snapshot = source.fetch_snapshot().await.unwrap();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.tickers[0].last_price.unit, Currency::cop());
    }

    #[tokio::test]
    async fn test_http_source_maps_error_status_to_upstream() {
        let router = Router::new().route(
            "/api/v2/tickers",
            get(|| async { (StatusCode::BAD_GATEWAY, "down") }),
        );
        let base = serve(router).await;
        let source =
            HttpTickerSource::new(format!("{}/api/v2/tickers", base), DEFAULT_FETCH_TIMEOUT)
                .unwrap();

        let result = source.fetch_snapshot().await;

        assert!(matches!(result, Err(FxError::Upstream(_))));
    }

    #[tokio::test]
    async fn test_http_source_skips_malformed_market_ids() {
        let router = Router::new().route(
            "/api/v2/tickers",
            get(|| async {
                r#"{"tickers":[
                    {"market_id":"ETHCOP","last_price":["1","COP"]},
                    {"market_id":"ETH-COP","last_price":["10600000.0","COP"]}
                ]}"#
            }),
        );
        let base = serve(router).await;
        let source =
            HttpTickerSource::new(format!("{}/api/v2/tickers", base), DEFAULT_FETCH_TIMEOUT)
                .unwrap();

        let snapshot = source.fetch_snapshot().await.unwrap();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.skipped_markets, vec!["ETHCOP".to_string()]);
    }

    #[tokio::test]
    async fn test_http_source_rejects_malformed_payload() {
        let router = Router::new().route(
            "/api/v2/tickers",
            get(|| async { r#"{"tickers":{"ETH-COP":["1","COP"]}}"# }),
        );
        let base = serve(router).await;
        let source =
            HttpTickerSource::new(format!("{}/api/v2/tickers", base), DEFAULT_FETCH_TIMEOUT)
                .unwrap();

        let result = source.fetch_snapshot().await;

        assert!(matches!(result, Err(FxError::Upstream(_))));
    }
}
