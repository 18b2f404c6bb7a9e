//! HTTP API
//!
//! `POST /api/consensus` runs one consensus round per request. Each request
//! carries its own provider keys; nothing is shared between requests except
//! the immutable [`AppState`].

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::router;
pub use state::{AppState, ProviderInfo};
