pub mod auth;
pub mod health;
pub mod packaging;
pub mod products;
mod router;

pub use router::router;

use uuid::Uuid;

use crate::error::AppError;

/// Path ids that are not UUIDs name no record, so they are NotFound.
pub(crate) fn parse_path_id(raw: &str, not_found: &'static str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::not_found(not_found))
}
