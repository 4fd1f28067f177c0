use sea_orm::{ColumnTrait, DatabaseConnection, QueryFilter, Select};

use super::{DaoBase, DaoResult, Page, key_contains};
use crate::db::entities::{packaging, prelude::Packaging, types::PackagingStatus};

#[derive(Clone)]
pub struct PackagingDao {
    db: DatabaseConnection,
}

impl DaoBase for PackagingDao {
    type Entity = Packaging;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

/// Status equality plus free-text search over designation and internal id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackagingFilter {
    pub status: Option<PackagingStatus>,
    pub search: Option<String>,
}

impl PackagingFilter {
    pub fn apply(&self, query: Select<Packaging>) -> Select<Packaging> {
        let query = match self.status {
            Some(status) => query.filter(packaging::Column::Status.eq(status)),
            None => query,
        };
        match self.search.as_deref() {
            Some(term) => query.filter(key_contains(packaging::Column::SearchKey, term)),
            None => query,
        }
    }
}

impl PackagingDao {
    pub async fn list(
        &self,
        filter: &PackagingFilter,
        page: u64,
        limit: u64,
    ) -> DaoResult<Page<packaging::Model>> {
        self.find_page(page, limit, |query| filter.apply(query)).await
    }

    pub async fn find_by_internal_id(
        &self,
        internal_id: &str,
    ) -> DaoResult<Option<packaging::Model>> {
        let internal_id = internal_id.to_string();
        self.find_first(move |query| query.filter(packaging::Column::InternalId.eq(internal_id)))
            .await
    }
}
