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
        product_service::{PRODUCT_NOT_FOUND, ProductInput},
        validation::ListParams,
        views::ProductView,
    },
    state::AppState,
};

use super::parse_path_id;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/{id}", get(get_product))
        .with_state(state)
}

async fn list_products(
    State(state): State<Arc<AppState>>,
    _auth: AuthGuard,
    Query(params): Query<ListParams>,
) -> ApiResult<Vec<ProductView>> {
    let service = ServiceContext::from_state(state.as_ref()).product();
    let page = service.list(&params).await?;
    let pagination = Pagination::from_page(&page);
    JsonApiResponse::paginated(page.items, pagination)
}

async fn get_product(
    State(state): State<Arc<AppState>>,
    _auth: AuthGuard,
    Path(id): Path<String>,
) -> ApiResult<ProductView> {
    let id = parse_path_id(&id, PRODUCT_NOT_FOUND)?;
    let service = ServiceContext::from_state(state.as_ref()).product();
    JsonApiResponse::ok(service.find(id).await?)
}

async fn create_product(
    State(state): State<Arc<AppState>>,
    _auth: AuthGuard,
    Json(body): Json<ProductInput>,
) -> ApiResult<ProductView> {
    let service = ServiceContext::from_state(state.as_ref()).product();
    JsonApiResponse::created(service.create(&body).await?)
}
