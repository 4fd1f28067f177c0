#![allow(dead_code)]

use axum::{
    Router,
    body::{self, Body},
    http::{Request, StatusCode, header},
};
use serde_json::Value;
use tower::ServiceExt; // for `oneshot`

pub async fn call(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

pub fn get(uri: &str, auth: Option<&str>) -> Request<Body> {
    with_auth(Request::builder().uri(uri), auth)
        .body(Body::empty())
        .unwrap()
}

pub fn delete(uri: &str, auth: &str) -> Request<Body> {
    with_auth(Request::builder().method("DELETE").uri(uri), Some(auth))
        .body(Body::empty())
        .unwrap()
}

pub fn send_json(method: &str, uri: &str, auth: Option<&str>, payload: &Value) -> Request<Body> {
    with_auth(Request::builder().method(method).uri(uri), auth)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

fn with_auth(builder: axum::http::request::Builder, auth: Option<&str>) -> axum::http::request::Builder {
    match auth {
        Some(value) => builder.header(header::AUTHORIZATION, value),
        None => builder,
    }
}
