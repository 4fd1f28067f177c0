use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

use super::types::ProductStatus;

#[base_entity]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    pub name: String,
    #[sea_orm(unique)]
    pub product_id: String,
    pub description: Option<String>,
    pub category: String,
    pub status: ProductStatus,
    /// Folded name and product id, matched by list search.
    pub search_key: String,
}

impl ActiveModelBehavior for ActiveModel {}
