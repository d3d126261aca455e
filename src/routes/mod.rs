//! API route table.

pub mod auth;
pub mod user;

use crate::auth::middleware::{protect, AppState};
use crate::error::AppError;
use crate::middleware::security_headers;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method, Uri},
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::cors::CorsLayer;

/// Build the API router with all endpoints.
///
/// Routes under `/api/v1/users`:
/// - `POST /signup`, `POST /login`
/// - `GET /signout`, `GET /isLoggedIn`, `GET /myProfile` (behind [`protect`])
pub fn api_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/signout", get(auth::signout))
        .route("/isLoggedIn", get(auth::is_logged_in))
        .route("/myProfile", get(user::my_profile))
        .route_layer(middleware::from_fn_with_state(state.clone(), protect));

    let users = Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .merge(protected);

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1/users", users)
        .fallback(not_found)
        .with_state(state)
}

/// The full application: API routes plus body limit, CORS and security headers.
pub fn app(state: AppState) -> Router {
    let max_body_bytes = state.config.max_body_bytes;
    let cors = cors_layer(state.config.cors_origin.as_deref());

    api_router(state)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(cors)
        .layer(middleware::from_fn(security_headers))
}

/// Credentialed CORS for a single configured origin.
///
/// With no origin (or an unparseable one) all cross-origin requests are
/// denied: `CorsLayer::new()` allows nothing.
fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let Some(origin) = origin else {
        return CorsLayer::new();
    };

    match origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_credentials(true)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE]),
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring invalid CORS_ORIGIN");
            CorsLayer::new()
        }
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "success" }))
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("Can't find {} on this server!", uri.path()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::TokenIssuer;
    use crate::config::{Config, StorageBackend};
    use crate::storage::memory::MemoryUserStore;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_state(cors_origin: Option<&str>) -> AppState {
        let config = Config {
            jwt_secret: "routes-test-secret".to_string(),
            jwt_expires_in_secs: 3600,
            jwt_cookie_expires_in_days: 1,
            production: false,
            storage_backend: StorageBackend::Memory,
            redis_url: None,
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            max_body_bytes: 1024,
            cors_origin: cors_origin.map(str::to_string),
        };
        let tokens = TokenIssuer::from_config(&config).unwrap();
        AppState::new(config, Arc::new(MemoryUserStore::new()), tokens)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(test_state(None))
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "success");
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let response = app(test_state(None))
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body["status"], "fail");
        assert_eq!(body["message"], "Can't find /nope on this server!");
    }

    #[tokio::test]
    async fn test_protected_routes_require_session() {
        for path in ["signout", "isLoggedIn", "myProfile"] {
            let response = app(test_state(None))
                .oneshot(
                    Request::builder()
                        .uri(format!("/api/v1/users/{}", path))
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", path);
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let response = app(test_state(None))
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/users/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["status"], "fail");
    }

    #[tokio::test]
    async fn test_cors_allows_configured_origin_with_credentials() {
        let response = app(test_state(Some("https://app.example.com")))
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header(header::ORIGIN, "https://app.example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let headers = response.headers();
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://app.example.com"
        );
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
            "true"
        );
    }

    #[tokio::test]
    async fn test_cors_denied_without_origin() {
        let response = app(test_state(None))
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header(header::ORIGIN, "https://evil.example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }
}
