//! HTTP service turning text prompts into video assets.
//!
//! Requests are validated at the edge, registered in the state store and
//! handed to the bounded admission controller; the generation pipeline
//! runs on worker tasks and writes progress back for polling clients.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod pipeline;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
