use sea_orm::{ColumnTrait, DatabaseConnection, IntoActiveModel, QueryFilter, Set};

use super::{DaoBase, DaoResult, Page, key_contains, search_key};
use crate::db::entities::{prelude::Product, product, types::ProductStatus};

#[derive(Clone)]
pub struct ProductDao {
    db: DatabaseConnection,
}

impl DaoBase for ProductDao {
    type Entity = Product;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub product_id: String,
    pub description: Option<String>,
    pub category: String,
    pub status: ProductStatus,
}

impl IntoActiveModel<product::ActiveModel> for NewProduct {
    fn into_active_model(self) -> product::ActiveModel {
        product::ActiveModel {
            search_key: Set(search_key(&[&self.name, &self.product_id])),
            name: Set(self.name),
            product_id: Set(self.product_id),
            description: Set(self.description),
            category: Set(self.category),
            status: Set(self.status),
            ..Default::default()
        }
    }
}

impl ProductDao {
    /// One page of products, optionally narrowed to those whose name or
    /// product id contains `search`.
    pub async fn search(
        &self,
        search: Option<&str>,
        page: u64,
        limit: u64,
    ) -> DaoResult<Page<product::Model>> {
        let search = search.map(str::to_string);
        self.find_page(page, limit, move |query| match search.as_deref() {
            Some(term) => query.filter(key_contains(product::Column::SearchKey, term)),
            None => query,
        })
        .await
    }

    pub async fn find_by_product_id(&self, product_id: &str) -> DaoResult<Option<product::Model>> {
        let product_id = product_id.to_string();
        self.find_first(move |query| query.filter(product::Column::ProductId.eq(product_id)))
            .await
    }

}
