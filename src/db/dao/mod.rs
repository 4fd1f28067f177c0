pub mod base;
pub mod base_traits;
mod context;
pub mod error;
pub mod packaging_dao;
pub mod product_dao;
pub mod user_dao;

pub use base::{DaoBase, Page, contains_pattern, escape_like, key_contains, search_key};
pub use base_traits::{
    AuditedActiveModel, BaseColumns, HasIdActiveModel, TimestampedActiveModel,
};
pub use context::DaoContext;
pub use error::{DaoLayerError, DaoResult};
pub use packaging_dao::{PackagingDao, PackagingFilter};
pub use product_dao::{NewProduct, ProductDao};
pub use user_dao::{NewUser, UserDao};
