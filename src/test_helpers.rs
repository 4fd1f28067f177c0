use std::{collections::BTreeMap, sync::Arc};

use axum::Router;
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use sea_orm::{DatabaseConnection, Value};
use uuid::Uuid;

use crate::{
    auth::{Role, jwt::JwtKeys},
    config::AppConfig,
    db::dao::search_key,
    db::entities::{
        packaging, product,
        types::{ConformityDeclaration, IdList, PackagingStatus, PpwrLevelList, ProductStatus, StringList},
        user,
    },
    routes,
    state::AppState,
};

pub const TEST_SECRET: &[u8] = b"test-secret";

pub fn ts() -> DateTime<FixedOffset> {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
        .fixed_offset()
}

pub fn user_model(id: Uuid, email: &str, name: &str) -> user::Model {
    user::Model {
        id,
        created_at: ts(),
        updated_at: ts(),
        email: email.to_string(),
        password_hash: "hash".to_string(),
        name: name.to_string(),
        role: Role::User.as_str().to_string(),
        last_login_at: None,
    }
}

pub fn product_model(id: Uuid, name: &str, product_id: &str) -> product::Model {
    product::Model {
        id,
        created_at: ts(),
        updated_at: ts(),
        name: name.to_string(),
        product_id: product_id.to_string(),
        description: None,
        category: "cups".to_string(),
        status: ProductStatus::Active,
        search_key: search_key(&[name, product_id]),
    }
}

/// An active packaging record created and last edited by `user`.
pub fn packaging_model(id: Uuid, internal_id: &str, user: Uuid) -> packaging::Model {
    packaging::Model {
        id,
        created_at: ts(),
        updated_at: ts(),
        designation: "Becher".to_string(),
        internal_id: internal_id.to_string(),
        gtin_article_number: "G1".to_string(),
        country_of_assembly: StringList(vec!["DE".to_string()]),
        sales_countries: StringList(vec!["DE".to_string()]),
        materials: StringList(vec!["PET".to_string()]),
        status: PackagingStatus::Active,
        weight: "100g".to_string(),
        ppwr_levels: PpwrLevelList::default(),
        conformity_declaration: ConformityDeclaration::NotAvailable,
        assigned_products: IdList::default(),
        search_key: search_key(&["Becher", internal_id]),
        created_by: user,
        last_modified_by: user,
    }
}

/// Mock row answering a `COUNT(*)` query.
pub fn count_row(n: i64) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([("num_items", Value::BigInt(Some(n)))])
}

pub fn test_state(db: DatabaseConnection) -> Arc<AppState> {
    AppState::new(AppConfig::default(), db, test_keys())
}

/// The full application router over `db`.
pub fn test_app(db: DatabaseConnection) -> Router {
    routes::app(test_state(db))
}

pub fn test_keys() -> JwtKeys {
    JwtKeys::new(TEST_SECRET, 60 * 60)
}

/// `Authorization` header value for a token issued to `user_id`.
pub fn bearer(user_id: Uuid) -> String {
    let token = test_keys()
        .issue(user_id, Role::User.granted())
        .expect("test token should encode");
    format!("Bearer {token}")
}
