//! BestRate Common Types
//!
//! Shared types used across BestRate: currency symbols, exchange market
//! identifiers, ticker records and the ticker snapshots an exchange publishes.

pub mod currency;
pub mod market;
pub mod snapshot;
pub mod error;

pub use currency::*;
pub use market::*;
pub use snapshot::*;
pub use error::*;
