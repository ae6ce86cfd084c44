//! Axum HTTP API server.
//!
//! This crate provides:
//! - Video generation and prompt refinement endpoints with mock fallback
//! - Job status lookup
//! - Account signup and login
//! - Static pages, health probes and Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

pub use config::{ApiConfig, StoreConfig};
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use services::AccountService;
pub use state::AppState;
