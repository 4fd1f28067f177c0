use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    db::dao::{NewProduct, Page, ProductDao},
    db::entities::types::ProductStatus,
    error::AppError,
    services::{
        crud_service::{CrudMessages, CrudOp, CrudService, UniqueField},
        validation::{FieldErrors, ListParams, PageRequest, normalize_search, optional_text},
        views::ProductView,
    },
};

pub const PRODUCT_NOT_FOUND: &str = "Product not found";
const PRODUCT_ID_TAKEN: &str = "Product ID already exists";

const PRODUCT_MESSAGES: CrudMessages = CrudMessages {
    title: "Product",
    noun: "product",
    unique: Some(UniqueField {
        field: "productId",
        message: PRODUCT_ID_TAKEN,
    }),
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductInput {
    pub name: Option<String>,
    pub product_id: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
}

impl ProductInput {
    pub fn validate(&self) -> Result<NewProduct, AppError> {
        let mut errors = FieldErrors::new();
        let new = NewProduct {
            name: errors.required_text("name", "Name", self.name.as_deref()),
            product_id: errors.required_text("productId", "Product ID", self.product_id.as_deref()),
            description: optional_text(self.description.as_deref()),
            category: errors.required_text("category", "Category", self.category.as_deref()),
            status: errors.enum_value("status", self.status.as_deref(), ProductStatus::default()),
        };
        errors.finish()?;
        Ok(new)
    }
}

#[derive(Clone)]
pub struct ProductService {
    product_dao: ProductDao,
}

impl CrudService for ProductService {
    type Dao = ProductDao;

    fn dao(&self) -> &Self::Dao {
        &self.product_dao
    }

    fn messages(&self) -> CrudMessages {
        PRODUCT_MESSAGES
    }
}

impl ProductService {
    pub fn new(product_dao: ProductDao) -> Self {
        Self { product_dao }
    }

    /// Searches name and product id; `status` in `params` is not used.
    pub async fn list(&self, params: &ListParams) -> Result<Page<ProductView>, AppError> {
        let request = PageRequest::parse(params.page.as_deref(), params.limit.as_deref())?;
        let search = normalize_search(params.search.as_deref());

        let page = self
            .product_dao
            .search(search.as_deref(), request.page, request.limit)
            .await
            .map_err(|err| self.map_error(CrudOp::Read, err))?;
        Ok(page.map(ProductView::from))
    }

    pub async fn find(&self, id: Uuid) -> Result<ProductView, AppError> {
        CrudService::find_by_id(self, id)
            .await
            .map(ProductView::from)
    }

    pub async fn create(&self, input: &ProductInput) -> Result<ProductView, AppError> {
        let new = input.validate()?;

        let existing = self
            .product_dao
            .find_by_product_id(&new.product_id)
            .await
            .map_err(|err| self.map_error(CrudOp::Read, err))?;
        if existing.is_some() {
            return Err(AppError::invalid_field("productId", PRODUCT_ID_TAKEN));
        }

        let model = CrudService::create(self, new).await?;
        tracing::info!(product_id = %model.product_id, "product created");
        Ok(ProductView::from(model))
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase};
    use uuid::Uuid;

    use super::ProductInput;
    use crate::db::entities::{product, types::ProductStatus};
    use crate::error::AppError;
    use crate::services::{ServiceContext, validation::ListParams};
    use crate::test_helpers::{count_row, product_model};

    fn cup_input() -> ProductInput {
        ProductInput {
            name: Some("Cup".to_string()),
            product_id: Some("P-1".to_string()),
            category: Some("cups".to_string()),
            description: Some("  ".to_string()),
            ..ProductInput::default()
        }
    }

    #[test]
    fn validate_defaults_status_and_drops_blank_description() {
        let new = cup_input().validate().expect("input should be valid");
        assert_eq!(new.status, ProductStatus::Active);
        assert_eq!(new.description, None);
    }

    #[test]
    fn validate_rejects_unknown_status() {
        let err = ProductInput {
            status: Some("retired".to_string()),
            ..cup_input()
        }
        .validate()
        .expect_err("status should be rejected");
        assert_eq!(err.field_errors()[0].field, "status");
    }

    #[tokio::test]
    async fn create_rejects_duplicate_product_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[product_model(Uuid::new_v4(), "Other", "P-1")]])
            .into_connection();
        let service = ServiceContext::new(&db).product();

        let err = service.create(&cup_input()).await.expect_err("duplicate");
        assert_eq!(err.field_errors()[0].field, "productId");
    }

    #[tokio::test]
    async fn create_returns_view() {
        let id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<product::Model>::new()])
            .append_query_results([[product_model(id, "Cup", "P-1")]])
            .into_connection();
        let service = ServiceContext::new(&db).product();

        let view = service.create(&cup_input()).await.expect("create");
        assert_eq!(view.id, id);
        assert_eq!(view.product_id, "P-1");
    }

    #[tokio::test]
    async fn list_searches_and_reports_total() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[count_row(1)]])
            .append_query_results([[product_model(Uuid::new_v4(), "Cup", "P-1")]])
            .into_connection();
        let service = ServiceContext::new(&db).product();

        let page = service
            .list(&ListParams {
                search: Some("cup".to_string()),
                ..ListParams::default()
            })
            .await
            .expect("list");
        assert_eq!(page.total_items, 1);
        assert_eq!(page.items[0].name, "Cup");
    }

    #[tokio::test]
    async fn find_unknown_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<product::Model>::new()])
            .into_connection();
        let service = ServiceContext::new(&db).product();

        let err = service.find(Uuid::new_v4()).await.expect_err("missing");
        assert!(matches!(err, AppError::NotFound(ref message) if message == "Product not found"));
    }
}
