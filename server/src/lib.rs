//! BestRate Server
//!
//! HTTP front end for the FX resolver: validates conversion queries, fetches a
//! fresh ticker snapshot per request and maps outcomes to HTTP responses.

pub mod api;
pub mod config;
pub mod error;
pub mod state;

pub use api::app_router;
pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use state::AppState;
