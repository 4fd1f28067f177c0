use sea_orm::{EntityTrait, IntoActiveModel};
use uuid::Uuid;

use crate::db::dao::{AuditedActiveModel, DaoBase, DaoLayerError};
use crate::error::{AppError, SERVER_ERROR};

type CrudEntity<D> = <D as DaoBase>::Entity;
type CrudModel<D> = <CrudEntity<D> as EntityTrait>::Model;
type CrudActiveModel<D> = <CrudEntity<D> as EntityTrait>::ActiveModel;

/// Names a service uses when reporting failures: `title` starts a sentence
/// ("Packaging not found"), `noun` ends one ("Failed to create packaging").
#[derive(Debug, Clone, Copy)]
pub struct CrudMessages {
    pub title: &'static str,
    pub noun: &'static str,
    /// Field blamed when the store rejects a write on a unique index.
    pub unique: Option<UniqueField>,
}

#[derive(Debug, Clone, Copy)]
pub struct UniqueField {
    pub field: &'static str,
    pub message: &'static str,
}

impl CrudMessages {
    pub fn not_found(&self) -> String {
        format!("{} not found", self.title)
    }

    /// Message shown for a store failure. Reads and deletes stay generic.
    pub fn failure(&self, op: CrudOp) -> String {
        match op {
            CrudOp::Create => format!("Failed to create {}", self.noun),
            CrudOp::Update => format!("Failed to update {}", self.noun),
            CrudOp::Read | CrudOp::Delete => SERVER_ERROR.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrudOp {
    Read,
    Create,
    Update,
    Delete,
}

/// Single-record operations over a DAO, with store failures translated into
/// the service's own messages.
#[async_trait::async_trait]
pub trait CrudService {
    type Dao: DaoBase;

    fn dao(&self) -> &Self::Dao;

    fn messages(&self) -> CrudMessages;

    fn map_error(&self, op: CrudOp, err: DaoLayerError) -> AppError {
        let messages = self.messages();
        match err {
            DaoLayerError::Db(db_err) => AppError::internal_with_source(messages.failure(op), db_err),
            DaoLayerError::NotFound { .. } => AppError::not_found(messages.not_found()),
            DaoLayerError::InvalidPagination { .. } => AppError::bad_request(err.to_string()),
            DaoLayerError::UniqueViolation { .. } => match messages.unique {
                Some(unique) => AppError::invalid_field(unique.field, unique.message),
                None => AppError::bad_request(err.to_string()),
            },
        }
    }

    async fn create<T>(&self, data: T) -> Result<CrudModel<Self::Dao>, AppError>
    where
        T: IntoActiveModel<CrudActiveModel<Self::Dao>> + Send,
    {
        self.dao()
            .create(data)
            .await
            .map_err(|err| self.map_error(CrudOp::Create, err))
    }

    /// Creates a record with `actor` as creator and last editor.
    async fn create_as<T>(&self, actor: Uuid, data: T) -> Result<CrudModel<Self::Dao>, AppError>
    where
        T: IntoActiveModel<CrudActiveModel<Self::Dao>> + Send,
        CrudActiveModel<Self::Dao>: AuditedActiveModel,
    {
        self.dao()
            .create_as(actor, data)
            .await
            .map_err(|err| self.map_error(CrudOp::Create, err))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<CrudModel<Self::Dao>, AppError> {
        self.dao()
            .find_by_id(id)
            .await
            .map_err(|err| self.map_error(CrudOp::Read, err))
    }

    /// Applies `apply` to the stored record and restamps `actor` as last
    /// editor.
    async fn update_as<F>(
        &self,
        id: Uuid,
        actor: Uuid,
        apply: F,
    ) -> Result<CrudModel<Self::Dao>, AppError>
    where
        F: for<'a> FnOnce(&'a mut CrudActiveModel<Self::Dao>) + Send,
        CrudActiveModel<Self::Dao>: AuditedActiveModel,
    {
        self.dao()
            .update_as(id, actor, apply)
            .await
            .map_err(|err| self.map_error(CrudOp::Update, err))
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.dao()
            .delete(id)
            .await
            .map(|_| ())
            .map_err(|err| self.map_error(CrudOp::Delete, err))
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult, Set};
    use uuid::Uuid;

    use super::{CrudMessages, CrudOp, CrudService, UniqueField};
    use crate::db::dao::{DaoBase, DaoLayerError, PackagingDao};
    use crate::db::entities::packaging;
    use crate::error::AppError;
    use crate::services::packaging_service::{NewPackaging, PackagingInput};
    use crate::test_helpers::packaging_model;

    const MESSAGES: CrudMessages = CrudMessages {
        title: "Packaging",
        noun: "packaging",
        unique: None,
    };

    struct Packagings {
        dao: PackagingDao,
        messages: CrudMessages,
    }

    impl CrudService for Packagings {
        type Dao = PackagingDao;

        fn dao(&self) -> &Self::Dao {
            &self.dao
        }

        fn messages(&self) -> CrudMessages {
            self.messages
        }
    }

    fn over(mock: MockDatabase) -> Packagings {
        Packagings {
            dao: PackagingDao::new(&mock.into_connection()),
            messages: MESSAGES,
        }
    }

    fn mock() -> MockDatabase {
        MockDatabase::new(DatabaseBackend::Postgres)
    }

    fn new_packaging() -> NewPackaging {
        PackagingInput {
            designation: Some("Becher".to_string()),
            internal_id: Some("X1".to_string()),
            gtin_article_number: Some("G1".to_string()),
            weight: Some("100g".to_string()),
            ..PackagingInput::default()
        }
        .validate()
        .expect("input should be valid")
    }

    #[test]
    fn messages_name_the_entity() {
        assert_eq!(MESSAGES.not_found(), "Packaging not found");
        assert_eq!(MESSAGES.failure(CrudOp::Create), "Failed to create packaging");
        assert_eq!(MESSAGES.failure(CrudOp::Update), "Failed to update packaging");
        assert_eq!(MESSAGES.failure(CrudOp::Delete), "Server error");
    }

    #[tokio::test]
    async fn create_as_returns_stored_model() {
        let actor = Uuid::new_v4();
        let stored = packaging_model(Uuid::new_v4(), "X1", actor);
        let service = over(mock().append_query_results([vec![stored.clone()]]));

        let created = service
            .create_as(actor, new_packaging())
            .await
            .expect("create should succeed");

        assert_eq!(created, stored);
    }

    #[tokio::test]
    async fn failed_insert_is_internal_with_create_message() {
        let service =
            over(mock().append_query_errors([DbErr::Custom("insert failed".to_string())]));

        let err = service
            .create(new_packaging())
            .await
            .expect_err("create should fail");

        assert!(matches!(err, AppError::Internal(_)));
        assert_eq!(err.message(), "Failed to create packaging");
    }

    #[tokio::test]
    async fn missing_row_uses_entity_not_found_message() {
        let service = over(mock().append_query_results([Vec::<packaging::Model>::new()]));

        let err = service
            .find_by_id(Uuid::new_v4())
            .await
            .expect_err("find_by_id should fail");

        assert_eq!(err.message(), "Packaging not found");
    }

    #[tokio::test]
    async fn update_as_of_missing_row_is_not_found_without_write() {
        let service = over(mock().append_query_results([Vec::<packaging::Model>::new()]));

        let err = service
            .update_as(Uuid::new_v4(), Uuid::new_v4(), |active| {
                active.weight = Set("250g".to_string());
            })
            .await
            .expect_err("update should fail");

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_as_restamps_editor() {
        let id = Uuid::new_v4();
        let editor = Uuid::new_v4();
        let stored = packaging_model(id, "X1", Uuid::new_v4());
        let mut saved = stored.clone();
        saved.weight = "250g".to_string();
        saved.last_modified_by = editor;
        let service = over(
            mock()
                .append_query_results([vec![stored]])
                .append_query_results([vec![saved]]),
        );

        let updated = service
            .update_as(id, editor, |active| {
                active.weight = Set("250g".to_string());
            })
            .await
            .expect("update should succeed");

        assert_eq!(updated.weight, "250g");
        assert_eq!(updated.last_modified_by, editor);
    }

    #[tokio::test]
    async fn second_delete_is_not_found() {
        let gone = |rows_affected| MockExecResult {
            last_insert_id: 0,
            rows_affected,
        };
        let service = over(mock().append_exec_results([gone(1), gone(0)]));
        let id = Uuid::new_v4();

        service.delete(id).await.expect("first delete should succeed");
        let err = service.delete(id).await.expect_err("second delete should fail");

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn unique_violation_blames_configured_field() {
        let violation = || DaoLayerError::UniqueViolation {
            entity: "packaging",
            detail: "duplicate key".to_string(),
        };
        let mut service = over(mock());
        assert!(matches!(
            service.map_error(CrudOp::Update, violation()),
            AppError::BadRequest(_)
        ));

        service.messages.unique = Some(UniqueField {
            field: "internalId",
            message: "Internal ID already exists",
        });
        let err = service.map_error(CrudOp::Update, violation());
        assert_eq!(err.field_errors()[0].field, "internalId");
    }
}
