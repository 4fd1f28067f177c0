use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::ServerConfig;

/// Browser access for the front end. Unparseable origins are skipped.
pub fn cors_layer(cfg: &ServerConfig) -> CorsLayer {
    let origin = match cfg.allowed_origins() {
        None => AllowOrigin::from(Any),
        Some(origins) => AllowOrigin::list(
            origins
                .iter()
                .filter_map(|origin| HeaderValue::from_str(origin).ok()),
        ),
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header},
        routing::get,
    };
    use tower::ServiceExt;

    use super::cors_layer;
    use crate::config::ServerConfig;

    fn app(cors_origins: &str) -> Router {
        let cfg = ServerConfig {
            cors_origins: cors_origins.to_string(),
            ..ServerConfig::default()
        };
        Router::new()
            .route("/ping", get(|| async { "pong" }))
            .layer(cors_layer(&cfg))
    }

    fn preflight(origin: &str) -> Request<Body> {
        Request::builder()
            .method("OPTIONS")
            .uri("/ping")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PUT")
            .body(Body::empty())
            .expect("request")
    }

    #[tokio::test]
    async fn wildcard_allows_any_origin() {
        let response = app("*")
            .oneshot(preflight("http://localhost:5173"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }

    #[tokio::test]
    async fn listed_origins_only() {
        let app = app("https://app.ppwrify.example");

        let allowed = app
            .clone()
            .oneshot(preflight("https://app.ppwrify.example"))
            .await
            .expect("response");
        assert_eq!(
            allowed.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://app.ppwrify.example"
        );

        let denied = app
            .oneshot(preflight("https://evil.example"))
            .await
            .expect("response");
        assert!(
            denied
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .is_none()
        );
    }
}
