//! HTTP API and router assembly.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use duo_chat_core::{AuthResult, LanguageOption, SUPPORTED_LANGUAGES};
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{dispatch::ChatState, websocket::ws_handler};

#[derive(Debug, Deserialize)]
pub struct AuthRequest {
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthConnections {
    pub user1: usize,
    pub user2: usize,
    pub total: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub connections: HealthConnections,
}

async fn auth_handler(
    State(state): State<ChatState>,
    Json(req): Json<AuthRequest>,
) -> (StatusCode, Json<AuthResult>) {
    let result = state.passwords.validate_password(&req.password);
    let status = if result.success {
        StatusCode::OK
    } else {
        StatusCode::UNAUTHORIZED
    };
    (status, Json(result))
}

async fn health_handler(State(state): State<ChatState>) -> Json<HealthResponse> {
    let status = state.registry.status();
    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: Utc::now(),
        connections: HealthConnections {
            user1: status.user1_connections,
            user2: status.user2_connections,
            total: status.total_connections,
        },
    })
}

async fn languages_handler() -> Json<Vec<LanguageOption>> {
    Json(SUPPORTED_LANGUAGES.to_vec())
}

/// Create the chat router: `/ws` plus the `/api` endpoints.
///
/// # Example
/// ```ignore
/// let app = create_router(state).route("/", get(index));
/// ```
#[must_use]
pub fn create_router(state: ChatState) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .route("/api/auth", post(auth_handler))
        .route("/api/health", get(health_handler))
        .route("/api/languages", get(languages_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
