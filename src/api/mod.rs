//! HTTP API.
//!
//! - `POST /api/query` - answer a question, returning sources and the session id
//! - `GET /api/courses` - catalog summary
//! - `POST /api/clear-session` - forget a session's history
//! - `GET /api/health` - liveness

mod routes;
pub mod types;

pub use routes::{router, serve, AppState};
