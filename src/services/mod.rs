pub mod auth_service;
pub mod context;
pub mod crud_service;
pub mod packaging_service;
pub mod product_service;
pub mod user_service;
pub mod validation;
pub mod views;

pub use context::ServiceContext;
