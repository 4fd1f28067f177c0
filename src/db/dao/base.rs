use chrono::Utc;
use sea_orm::sea_query::{Expr, ExprTrait, IntoColumnRef, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, FromQueryResult,
    IntoActiveModel, PaginatorTrait, PrimaryKeyTrait, QueryFilter, QueryOrder, QuerySelect, Select,
};
use uuid::Uuid;

use super::base_traits::{
    AuditedActiveModel, BaseColumns, HasIdActiveModel, TimestampedActiveModel,
};
use super::error::{DaoLayerError, DaoResult};

/// One page of rows plus the size of the whole filtered set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based.
    pub page: u64,
    pub limit: u64,
    pub total_items: u64,
}

impl<T> Page<T> {
    /// Number of pages needed for `total_items`; zero for an empty set.
    pub fn page_count(&self) -> u64 {
        self.total_items.div_ceil(Ord::max(self.limit, 1))
    }

    pub fn has_next(&self) -> bool {
        self.page < self.page_count()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        let Page {
            items,
            page,
            limit,
            total_items,
        } = self;
        Page {
            items: items.into_iter().map(f).collect(),
            page,
            limit,
            total_items,
        }
    }

    /// Same page metadata around different rows.
    pub fn with_items<U>(self, items: Vec<U>) -> Page<U> {
        Page {
            items,
            page: self.page,
            limit: self.limit,
            total_items: self.total_items,
        }
    }
}

/// Escapes `%`, `_` and `\` so user text matches literally inside a LIKE
/// pattern using `\` as the escape character.
pub fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '%' => escaped.push_str("\\%"),
            '_' => escaped.push_str("\\_"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

// Joins the parts of a search key. Not something a user can type.
const SEARCH_KEY_SEPARATOR: &str = "\u{1f}";

/// Lower-cased copy of the searchable fields, stored beside them. Folding
/// happens here rather than in SQL because SQLite's `LOWER` only folds
/// ASCII.
pub fn search_key(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|part| part.to_lowercase())
        .collect::<Vec<_>>()
        .join(SEARCH_KEY_SEPARATOR)
}

/// Lower-cased `%term%` pattern for case-insensitive substring search.
pub fn contains_pattern(term: &str) -> String {
    let folded = term.to_lowercase().replace(SEARCH_KEY_SEPARATOR, "");
    format!("%{}%", escape_like(&folded))
}

/// Matches rows whose search key `column` contains `term`, ignoring case.
pub fn key_contains<C>(column: C, term: &str) -> Condition
where
    C: IntoColumnRef,
{
    Condition::all()
        .add(Expr::col(column).like(LikeExpr::new(contains_pattern(term)).escape('\\')))
}

#[async_trait::async_trait]
pub trait DaoBase: Clone + Send + Sync + Sized
where
    <Self::Entity as EntityTrait>::Model:
        FromQueryResult + IntoActiveModel<<Self::Entity as EntityTrait>::ActiveModel> + Send + Sync,
    <Self::Entity as EntityTrait>::ActiveModel:
        ActiveModelTrait<Entity = Self::Entity> + HasIdActiveModel + TimestampedActiveModel + Send,
    <<Self::Entity as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType:
        From<Uuid> + Send + Sync,
    Self::Entity: BaseColumns,
{
    type Entity: EntityTrait + Send + Sync;
    const MAX_PAGE_SIZE: u64 = 100;

    fn new(db: &DatabaseConnection) -> Self;

    fn db(&self) -> &DatabaseConnection;

    fn entity_name() -> &'static str {
        std::any::type_name::<Self::Entity>()
    }

    async fn create(
        &self,
        data: impl IntoActiveModel<<Self::Entity as EntityTrait>::ActiveModel> + Send,
    ) -> DaoResult<<Self::Entity as EntityTrait>::Model> {
        let now = Utc::now().fixed_offset();
        let mut active = data.into_active_model();
        active.set_id(Uuid::new_v4());
        active.set_created_at(now);
        active.set_updated_at(now);
        active
            .insert(self.db())
            .await
            .map_err(|err| DaoLayerError::from_write(Self::entity_name(), err))
    }

    /// Inserts a record stamped with `actor` as both creator and last editor.
    async fn create_as(
        &self,
        actor: Uuid,
        data: impl IntoActiveModel<<Self::Entity as EntityTrait>::ActiveModel> + Send,
    ) -> DaoResult<<Self::Entity as EntityTrait>::Model>
    where
        <Self::Entity as EntityTrait>::ActiveModel: AuditedActiveModel,
    {
        let mut active = data.into_active_model();
        active.set_created_by(actor);
        active.set_last_modified_by(actor);
        self.create(active).await
    }

    async fn find_by_id(&self, id: Uuid) -> DaoResult<<Self::Entity as EntityTrait>::Model> {
        let model = Self::Entity::find_by_id(id)
            .one(self.db())
            .await
            .map_err(DaoLayerError::Db)?;

        model.ok_or(DaoLayerError::NotFound {
            entity: Self::entity_name(),
            id,
        })
    }

    /// Rows whose id is in `ids`. Unknown ids are simply absent; an empty
    /// `ids` issues no query.
    async fn find_by_ids(&self, ids: &[Uuid]) -> DaoResult<Vec<<Self::Entity as EntityTrait>::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Self::Entity::find()
            .filter(Self::Entity::id_column().is_in(ids.iter().copied()))
            .all(self.db())
            .await
            .map_err(DaoLayerError::Db)
    }

    /// The newest row matching `apply`, if any.
    async fn find_first(
        &self,
        apply: impl FnOnce(Select<Self::Entity>) -> Select<Self::Entity> + Send,
    ) -> DaoResult<Option<<Self::Entity as EntityTrait>::Model>> {
        apply(Self::Entity::find())
            .order_by_desc(Self::Entity::created_at_column())
            .one(self.db())
            .await
            .map_err(DaoLayerError::Db)
    }

    /// Counts every row matching `apply`, then fetches the requested page
    /// newest first. Issues exactly two queries: the count, then the page.
    async fn find_page<F>(
        &self,
        page: u64,
        limit: u64,
        apply: F,
    ) -> DaoResult<Page<<Self::Entity as EntityTrait>::Model>>
    where
        F: Fn(Select<Self::Entity>) -> Select<Self::Entity> + Send + Sync,
    {
        if page == 0 || limit == 0 || limit > Self::MAX_PAGE_SIZE {
            return Err(DaoLayerError::InvalidPagination { page, limit });
        }

        let total_items = apply(Self::Entity::find())
            .count(self.db())
            .await
            .map_err(DaoLayerError::Db)?;

        let items = apply(Self::Entity::find())
            .order_by_desc(Self::Entity::created_at_column())
            .limit(limit)
            .offset((page - 1).saturating_mul(limit))
            .all(self.db())
            .await
            .map_err(DaoLayerError::Db)?;

        Ok(Page {
            items,
            page,
            limit,
            total_items,
        })
    }

    async fn update<F>(&self, id: Uuid, apply: F) -> DaoResult<<Self::Entity as EntityTrait>::Model>
    where
        F: for<'a> FnOnce(&'a mut <Self::Entity as EntityTrait>::ActiveModel) + Send,
    {
        let model = Self::Entity::find_by_id(id)
            .one(self.db())
            .await
            .map_err(DaoLayerError::Db)?
            .ok_or(DaoLayerError::NotFound {
                entity: Self::entity_name(),
                id,
            })?;

        let mut active = model.into_active_model();
        apply(&mut active);
        active.set_updated_at(Utc::now().fixed_offset());

        active
            .update(self.db())
            .await
            .map_err(|err| DaoLayerError::from_write(Self::entity_name(), err))
    }

    /// Like [`DaoBase::update`], also recording `actor` as the last editor.
    async fn update_as<F>(
        &self,
        id: Uuid,
        actor: Uuid,
        apply: F,
    ) -> DaoResult<<Self::Entity as EntityTrait>::Model>
    where
        F: for<'a> FnOnce(&'a mut <Self::Entity as EntityTrait>::ActiveModel) + Send,
        <Self::Entity as EntityTrait>::ActiveModel: AuditedActiveModel,
    {
        self.update(id, move |active| {
            apply(active);
            active.set_last_modified_by(actor);
        })
        .await
    }

    async fn delete(&self, id: Uuid) -> DaoResult<Uuid> {
        let result = Self::Entity::delete_by_id(id)
            .exec(self.db())
            .await
            .map_err(DaoLayerError::Db)?;

        if result.rows_affected == 0 {
            return Err(DaoLayerError::NotFound {
                entity: Self::entity_name(),
                id,
            });
        }

        Ok(id)
    }
}
