use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{auth::jwt::JwtKeys, config::AppConfig};

/// Everything a request handler needs, shared behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: DatabaseConnection,
    pub jwt: JwtKeys,
}

impl AppState {
    pub fn new(config: AppConfig, db: DatabaseConnection, jwt: JwtKeys) -> Arc<Self> {
        Arc::new(Self { config, db, jwt })
    }
}
