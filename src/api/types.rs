//! API request and response types.

use serde::{Deserialize, Serialize};

use crate::tools::Source;

/// Request to answer a question.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    /// The user's question
    pub query: String,

    /// Existing session to continue (a new one is created if absent)
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Answer with supporting sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
    pub sources: Vec<Source>,
    pub session_id: String,
}

/// Request to forget a session's history.
#[derive(Debug, Clone, Deserialize)]
pub struct ClearSessionRequest {
    pub session_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearSessionResponse {
    pub success: bool,
    pub message: String,
}

/// Error body for failed requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}
