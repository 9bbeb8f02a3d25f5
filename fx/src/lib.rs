//! BestRate FX Resolver
//!
//! Finds the best achievable conversion between two assets using the last
//! traded prices an exchange publishes, optionally bridging through exactly
//! one intermediary asset.
//!
//! # Features
//!
//! - Per-request market index built from a ticker snapshot
//! - Direct and inverse market detection with priority over bridging
//! - Single-hop intermediary search under an explicit [`BridgeStrategy`]
//! - Pluggable ticker sources, with an HTTP source for live exchanges
//!
//! # Example
//!
//! ```rust,ignore
//! use bestrate_fx::{ConversionRequest, RateResolver};
//! use bestrate_common::{Currency, TickerSnapshot};
//!
//! let resolver = RateResolver::default();
//! let request = ConversionRequest::new(Currency::clp(), Currency::cop(), 1000.0);
//! let resolution = resolver.resolve(&request, &snapshot)?;
//! ```

pub mod engine;
pub mod provider;
pub mod index;
pub mod conversion;
pub mod resolver;
pub mod error;

pub use engine::{FxEngine, FxEngineConfig};
pub use provider::{HttpTickerSource, TickerSource};
pub use index::MarketIndex;
pub use conversion::{ConversionRequest, Resolution};
pub use resolver::{BridgeStrategy, RateResolver};
pub use error::{FxError, FxResult};

#[cfg(any(test, feature = "test-utils"))]
pub use provider::{FailingTickerSource, StaticTickerSource};
