use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::{
    middleware::AuthGuard,
    response::{ApiResult, JsonApiResponse},
    services::{
        ServiceContext,
        auth_service::{LoginRequest, RegisterRequest},
        views::{AuthPayload, UserView},
    },
    state::AppState,
};

#[derive(Debug, Serialize, Deserialize)]
pub struct MeResponse {
    pub user: UserView,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
        .with_state(state)
}

async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterRequest>,
) -> ApiResult<AuthPayload> {
    let services = ServiceContext::from_state(state.as_ref());
    let payload = services.auth(&state.jwt).register(&body).await?;
    JsonApiResponse::created(payload)
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<AuthPayload> {
    let services = ServiceContext::from_state(state.as_ref());
    let payload = services.auth(&state.jwt).login(&body).await?;
    JsonApiResponse::ok(payload)
}

async fn me(State(state): State<Arc<AppState>>, claims: AuthGuard) -> ApiResult<MeResponse> {
    let services = ServiceContext::from_state(state.as_ref());
    let user = services.auth(&state.jwt).me(&claims).await?;
    JsonApiResponse::ok(MeResponse { user })
}
