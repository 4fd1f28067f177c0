use sea_orm::{DbErr, SqlErr};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum DaoLayerError {
    #[error("Database error: {0}")]
    Db(DbErr),
    #[error("{entity} not found (id={id})")]
    NotFound { entity: &'static str, id: Uuid },
    #[error("Invalid pagination: page={page} limit={limit}")]
    InvalidPagination { page: u64, limit: u64 },
    #[error("{entity} violates a unique constraint: {detail}")]
    UniqueViolation { entity: &'static str, detail: String },
}

pub type DaoResult<T> = Result<T, DaoLayerError>;

impl DaoLayerError {
    /// Classifies a write error, separating unique index violations from other
    /// store failures.
    pub fn from_write(entity: &'static str, err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                DaoLayerError::UniqueViolation { entity, detail }
            }
            _ => DaoLayerError::Db(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::DbErr;
    use uuid::Uuid;

    use super::DaoLayerError;

    #[test]
    fn display_names_entity_and_id() {
        let id = Uuid::nil();
        let err = DaoLayerError::NotFound {
            entity: "packaging",
            id,
        };
        assert_eq!(
            err.to_string(),
            "packaging not found (id=00000000-0000-0000-0000-000000000000)"
        );
    }

    #[test]
    fn from_write_keeps_generic_errors_as_db() {
        let err = DaoLayerError::from_write("packaging", DbErr::Custom("boom".to_string()));
        assert!(matches!(err, DaoLayerError::Db(_)));
    }
}
