use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};

use crate::{
    middleware::AuthGuard,
    response::{ApiResult, JsonApiResponse, Pagination},
    services::{
        ServiceContext,
        packaging_service::{PACKAGING_NOT_FOUND, PackagingInput},
        validation::ListParams,
        views::PackagingView,
    },
    state::AppState,
};

use super::parse_path_id;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/packaging", get(list_packaging).post(create_packaging))
        .route(
            "/packaging/{id}",
            get(get_packaging)
                .put(update_packaging)
                .delete(delete_packaging),
        )
        .with_state(state)
}

async fn list_packaging(
    State(state): State<Arc<AppState>>,
    _auth: AuthGuard,
    Query(params): Query<ListParams>,
) -> ApiResult<Vec<PackagingView>> {
    let service = ServiceContext::from_state(state.as_ref()).packaging();
    let page = service.list(&params).await?;
    let pagination = Pagination::from_page(&page);
    JsonApiResponse::paginated(page.items, pagination)
}

async fn get_packaging(
    State(state): State<Arc<AppState>>,
    _auth: AuthGuard,
    Path(id): Path<String>,
) -> ApiResult<PackagingView> {
    let id = parse_path_id(&id, PACKAGING_NOT_FOUND)?;
    let service = ServiceContext::from_state(state.as_ref()).packaging();
    JsonApiResponse::ok(service.find(id).await?)
}

async fn create_packaging(
    State(state): State<Arc<AppState>>,
    claims: AuthGuard,
    Json(body): Json<PackagingInput>,
) -> ApiResult<PackagingView> {
    let actor = claims.user_id();
    let service = ServiceContext::from_state(state.as_ref()).packaging();
    JsonApiResponse::created(service.create(actor, &body).await?)
}

async fn update_packaging(
    State(state): State<Arc<AppState>>,
    claims: AuthGuard,
    Path(id): Path<String>,
    Json(body): Json<PackagingInput>,
) -> ApiResult<PackagingView> {
    let id = parse_path_id(&id, PACKAGING_NOT_FOUND)?;
    let actor = claims.user_id();
    let service = ServiceContext::from_state(state.as_ref()).packaging();
    JsonApiResponse::ok(service.update(id, actor, body).await?)
}

async fn delete_packaging(
    State(state): State<Arc<AppState>>,
    _auth: AuthGuard,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let id = parse_path_id(&id, PACKAGING_NOT_FOUND)?;
    let service = ServiceContext::from_state(state.as_ref()).packaging();
    service.delete(id).await?;
    JsonApiResponse::message("Packaging deleted successfully")
}
