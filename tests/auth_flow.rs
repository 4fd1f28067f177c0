mod common;

use axum::http::StatusCode;
use sea_orm::{DatabaseBackend, MockDatabase};
use serde_json::json;
use uuid::Uuid;

use ppwrify::{
    auth::password::hash_password,
    db::entities::user,
    test_helpers::{bearer, test_app, ts, user_model},
};

use common::{call, get, send_json};

#[tokio::test]
async fn health_reports_running_server() {
    let app = test_app(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let (status, json) = call(app, get("/api/health", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Server is running");
    assert!(json["database"]["connected"].is_boolean());
}

#[tokio::test]
async fn register_returns_token_and_user() {
    let id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<user::Model>::new()])
        .append_query_results([[user_model(id, "bob@example.com", "Bob")]])
        .into_connection();

    let payload = json!({"email": " Bob@Example.com ", "password": "secret1", "name": "Bob"});
    let (status, json) = call(
        test_app(db),
        send_json("POST", "/api/auth/register", None, &payload),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["success"], true);
    assert!(json["data"]["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(json["data"]["user"]["email"], "bob@example.com");
    assert!(json["data"]["user"].get("passwordHash").is_none());
}

#[tokio::test]
async fn register_lists_every_invalid_field() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

    let payload = json!({"email": "bob", "password": "123"});
    let (status, json) = call(
        test_app(db),
        send_json("POST", "/api/auth/register", None, &payload),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    let fields: Vec<_> = json["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(fields, vec!["email", "name", "password"]);
}

#[tokio::test]
async fn login_then_me() {
    let id = Uuid::new_v4();
    let mut stored = user_model(id, "alice@example.com", "Alice");
    stored.password_hash = hash_password("secret1").unwrap();
    let mut after = stored.clone();
    after.last_login_at = Some(ts());

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[stored.clone()]])
        .append_query_results([[stored.clone()]])
        .append_query_results([[after.clone()]])
        .append_query_results([[after]])
        .into_connection();
    let app = test_app(db);

    let payload = json!({"email": "alice@example.com", "password": "secret1"});
    let (status, json) = call(
        app.clone(),
        send_json("POST", "/api/auth/login", None, &payload),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["data"]["user"]["lastLoginAt"].is_string());

    let token = json["data"]["token"].as_str().unwrap();
    let auth = format!("Bearer {token}");
    let (status, json) = call(app, get("/api/auth/me", Some(&auth))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["user"]["id"], id.to_string());
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let mut stored = user_model(Uuid::new_v4(), "alice@example.com", "Alice");
    stored.password_hash = hash_password("secret1").unwrap();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[stored]])
        .into_connection();

    let payload = json!({"email": "alice@example.com", "password": "wrong-one"});
    let (status, json) = call(
        test_app(db),
        send_json("POST", "/api/auth/login", None, &payload),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["message"], "Invalid credentials");
}

#[tokio::test]
async fn me_requires_a_token() {
    let app = test_app(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let (status, json) = call(app.clone(), get("/api/auth/me", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["success"], false);

    let (status, json) = call(app, get("/api/auth/me", Some("Bearer not-a-jwt"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["message"], "Invalid or expired token");
}

#[tokio::test]
async fn me_for_deleted_user_is_unauthorized() {
    let id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<user::Model>::new()])
        .into_connection();

    let (status, json) = call(test_app(db), get("/api/auth/me", Some(&bearer(id)))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["message"], "User no longer exists");
}
