//! HTTP routes.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use super::types::{
    ClearSessionRequest, ClearSessionResponse, ErrorResponse, HealthResponse, QueryRequest,
    QueryResponse,
};
use crate::config::Config;
use crate::rag::{CourseAnalytics, RagSystem};

/// Shared state for all handlers.
pub struct AppState {
    pub rag: RagSystem,
}

/// Handler error mapped to a JSON `{detail}` body.
struct ApiError {
    status: StatusCode,
    detail: String,
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse { detail: self.detail })).into_response()
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/query", post(query))
        .route("/api/courses", get(courses))
        .route("/api/clear-session", post(clear_session))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(config: &Config, rag: RagSystem) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, router(Arc::new(AppState { rag }))).await?;
    Ok(())
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn query(
    State(state): State<Arc<AppState>>,
    Json(req): Json<QueryRequest>,
) -> Json<QueryResponse> {
    let session_id = match req.session_id.filter(|id| !id.trim().is_empty()) {
        Some(id) => id,
        None => state.rag.sessions().create_session().await,
    };

    let (answer, sources) = state.rag.query(&req.query, Some(&session_id)).await;

    Json(QueryResponse {
        answer,
        sources,
        session_id,
    })
}

async fn courses(State(state): State<Arc<AppState>>) -> Result<Json<CourseAnalytics>, ApiError> {
    let analytics = state.rag.course_analytics().await.map_err(|e| {
        error!("Course analytics failed: {}", e);
        ApiError::from(e)
    })?;
    Ok(Json(analytics))
}

async fn clear_session(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ClearSessionRequest>,
) -> Json<ClearSessionResponse> {
    state.rag.sessions().clear_session(&req.session_id).await;
    Json(ClearSessionResponse {
        success: true,
        message: "Session cleared successfully".to_string(),
    })
}
