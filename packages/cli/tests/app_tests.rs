// ABOUTME: Integration tests for the assembled server router
// ABOUTME: Checks CORS for cookie-carrying requests and the public health endpoint

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use intake_ai::AIService;
use intake_api::{AppState, CookieSettings};
use intake_auth::{AuthProviderConfig, SupabaseAuth};
use intake_cli::{build_app, config::Config};

fn test_config() -> Config {
    Config::from_lookup(|name| match name {
        "CORS_ORIGIN" => Some("http://localhost:5173".to_string()),
        _ => None,
    })
    .unwrap()
}

fn test_state(api_key: &str) -> AppState {
    // Never reached: these tests only hit routes that skip the providers
    let auth_config = AuthProviderConfig::new("http://127.0.0.1:9", "anon").unwrap();
    AppState::new(
        Arc::new(AIService::with_api_key(api_key.to_string())),
        Arc::new(SupabaseAuth::new(auth_config)),
        CookieSettings::default(),
    )
}

#[tokio::test]
async fn test_health_reports_model_configuration() {
    let app = build_app(test_state("tu-api-key-aqui"), &test_config()).unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["model_configured"], false);
}

#[tokio::test]
async fn test_cors_preflight_allows_credentials() {
    let app = build_app(test_state("sk-test"), &test_config()).unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/chat")
                .header(header::ORIGIN, "http://localhost:5173")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://localhost:5173"
    );
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
        "true"
    );
}

#[tokio::test]
async fn test_protected_route_without_cookie_is_unauthorized() {
    let app = build_app(test_state("sk-test"), &test_config()).unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/chat/session")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[test]
fn test_invalid_cors_origin_is_rejected() {
    let mut config = test_config();
    config.cors_origin = "bad\norigin".to_string();

    assert!(build_app(test_state("sk-test"), &config).is_err());
}

#[test]
fn test_wildcard_cors_origin_is_an_error_not_a_panic() {
    let mut config = test_config();
    config.cors_origin = "*".to_string();

    assert!(build_app(test_state("sk-test"), &config).is_err());
}
