//! Read models returned by the API. Entities keep references as bare ids;
//! these carry them resolved.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::entities::{
    packaging, product, user,
    types::{ConformityDeclaration, PackagingStatus, PpwrLevel, ProductStatus},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: Uuid,
    pub name: String,
}

impl From<&user::Model> for UserRef {
    fn from(user: &user::Model) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRef {
    pub id: Uuid,
    pub name: String,
    pub product_id: String,
}

impl From<&product::Model> for ProductRef {
    fn from(product: &product::Model) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            product_id: product.product_id.clone(),
        }
    }
}

/// A packaging record with its user and product references resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackagingView {
    pub id: Uuid,
    pub designation: String,
    pub internal_id: String,
    pub gtin_article_number: String,
    pub country_of_assembly: Vec<String>,
    pub sales_countries: Vec<String>,
    pub materials: Vec<String>,
    pub status: PackagingStatus,
    pub weight: String,
    pub ppwr_levels: Vec<PpwrLevel>,
    pub conformity_declaration: ConformityDeclaration,
    pub assigned_products: Vec<ProductRef>,
    pub created_by: Option<UserRef>,
    pub last_modified_by: Option<UserRef>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl PackagingView {
    /// Builds the view from `model`, looking references up in the loaded
    /// `users` and `products`. Dangling user ids become `None`; dangling
    /// product ids are dropped.
    pub fn resolve(
        model: packaging::Model,
        users: &[user::Model],
        products: &[product::Model],
    ) -> Self {
        let user_ref = |id: Uuid| users.iter().find(|user| user.id == id).map(UserRef::from);
        let assigned_products = model
            .assigned_products
            .0
            .iter()
            .filter_map(|id| products.iter().find(|product| product.id == *id))
            .map(ProductRef::from)
            .collect();

        Self {
            id: model.id,
            created_by: user_ref(model.created_by),
            last_modified_by: user_ref(model.last_modified_by),
            designation: model.designation,
            internal_id: model.internal_id,
            gtin_article_number: model.gtin_article_number,
            country_of_assembly: model.country_of_assembly.0,
            sales_countries: model.sales_countries.0,
            materials: model.materials.0,
            status: model.status,
            weight: model.weight,
            ppwr_levels: model.ppwr_levels.0,
            conformity_declaration: model.conformity_declaration,
            assigned_products,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub id: Uuid,
    pub name: String,
    pub product_id: String,
    pub description: Option<String>,
    pub category: String,
    pub status: ProductStatus,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<product::Model> for ProductView {
    fn from(model: product::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            product_id: model.product_id,
            description: model.description,
            category: model.category,
            status: model.status,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Public user profile; never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
    pub last_login_at: Option<DateTime<FixedOffset>>,
    pub created_at: DateTime<FixedOffset>,
}

impl From<user::Model> for UserView {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            name: model.name,
            role: model.role,
            last_login_at: model.last_login_at,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthPayload {
    pub token: String,
    pub user: UserView,
}
