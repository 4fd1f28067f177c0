use sea_orm::DatabaseConnection;

use crate::{
    auth::jwt::JwtKeys,
    db::dao::DaoContext,
    services::{
        auth_service::AuthService, packaging_service::PackagingService,
        product_service::ProductService, user_service::UserService,
    },
    state::AppState,
};

#[derive(Clone)]
pub struct ServiceContext {
    daos: DaoContext,
}

impl ServiceContext {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self {
            daos: DaoContext::new(db),
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(&state.db)
    }

    pub fn user(&self) -> UserService {
        UserService::new(self.daos.user())
    }

    pub fn product(&self) -> ProductService {
        ProductService::new(self.daos.product())
    }

    pub fn packaging(&self) -> PackagingService {
        PackagingService::new(
            self.daos.packaging(),
            self.daos.user(),
            self.daos.product(),
        )
    }

    pub fn auth<'a>(&self, jwt: &'a JwtKeys) -> AuthService<'a> {
        AuthService::new(self.user(), jwt)
    }
}
