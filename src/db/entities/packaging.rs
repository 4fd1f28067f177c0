use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

use super::types::{ConformityDeclaration, IdList, PackagingStatus, PpwrLevelList, StringList};

// `assigned_products`, `created_by` and `last_modified_by` hold ids only.
// Dangling ids are tolerated and resolved when records are read.
#[base_entity(audited)]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
#[sea_orm(table_name = "packaging")]
pub struct Model {
    pub designation: String,
    #[sea_orm(unique)]
    pub internal_id: String,
    pub gtin_article_number: String,
    pub country_of_assembly: StringList,
    pub sales_countries: StringList,
    pub materials: StringList,
    #[sea_orm(indexed)]
    pub status: PackagingStatus,
    pub weight: String,
    pub ppwr_levels: PpwrLevelList,
    pub conformity_declaration: ConformityDeclaration,
    pub assigned_products: IdList,
    /// Folded designation and internal id, matched by list search.
    pub search_key: String,
}

impl ActiveModelBehavior for ActiveModel {}
