use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::get};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{db::connection::is_connected, state::AppState};

#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseHealth {
    pub status: String,
    pub connected: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub database: DatabaseHealth,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .with_state(state)
}

// Always 200; callers read `database.connected`.
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let connected = is_connected(&state.db).await;
    Json(HealthResponse {
        success: true,
        message: "Server is running".to_string(),
        timestamp: Utc::now(),
        database: DatabaseHealth {
            status: if connected { "connected" } else { "disconnected" }.to_string(),
            connected,
        },
    })
}
