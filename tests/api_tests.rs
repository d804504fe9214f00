use school_chat_relay::config::Config;
use school_chat_relay::message::ChatResponse;
use school_chat_relay::routes::{CLOUD_FUNCTION_PATH, HTTP_FUNCTION_PATH, create_router};
use school_chat_relay::services::credentials::Binding;
use school_chat_relay::services::extract::MAX_FALLBACK_CHARS;
use school_chat_relay::state::AppState;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::util::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

fn app_with(cfg: Config) -> Router {
    let state = Arc::new(AppState::from_config(&cfg).unwrap());
    create_router(&cfg.static_dir).with_state(state)
}

fn keyed_config(base_url: String) -> Config {
    Config {
        gemini_key: Some("test-key".to_string()),
        cloud_runtime_config: Some(r#"{"gemini":{"key":"test-key"}}"#.to_string()),
        base_url,
        ..Default::default()
    }
}

async fn send(app: Router, method: &str, uri: &str, body: &str) -> (StatusCode, HeaderMap, Vec<u8>) {
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_owned()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, bytes.to_vec())
}

async fn post_json(app: Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let (status, _, bytes) = send(app, "POST", uri, body).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn mock_upstream(template: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(query_param("key", "test-key"))
        .respond_with(template)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_preflight_is_no_content_with_cors_headers() {
    for uri in [HTTP_FUNCTION_PATH, CLOUD_FUNCTION_PATH] {
        let app = app_with(Config::default());
        let (status, headers, body) = send(app, "OPTIONS", uri, "definitely not json").await;

        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_empty());
        assert_eq!(headers["access-control-allow-origin"], "*");
        assert_eq!(headers["access-control-allow-methods"], "POST, OPTIONS");
        assert_eq!(headers["access-control-allow-headers"], "Content-Type");
    }
}

#[tokio::test]
async fn test_other_methods_are_rejected() {
    for verb in ["GET", "PUT", "DELETE", "PATCH"] {
        let app = app_with(Config::default());
        let (status, headers, body) = send(app, verb, CLOUD_FUNCTION_PATH, "").await;
        let body: Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{verb}");
        assert!(body["error"].is_string());
        assert_eq!(headers["access-control-allow-origin"], "*");
    }
}

#[tokio::test]
async fn test_bad_message_is_rejected() {
    for body in ["{}", r#"{"message": 7}"#, r#"{"message": "  "}"#, "not json"] {
        let app = app_with(Config::default());
        let (status, json) = post_json(app, HTTP_FUNCTION_PATH, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert!(json["error"].is_string());
    }
}

#[tokio::test]
async fn test_oversized_body_still_answers_json() {
    let body = json!({ "message": "a".repeat(3 * 1024 * 1024) }).to_string();
    for uri in [HTTP_FUNCTION_PATH, CLOUD_FUNCTION_PATH] {
        let app = app_with(Config::default());
        let (status, headers, bytes) = send(app, "POST", uri, &body).await;
        let json: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert!(json["error"].is_string());
        assert_eq!(headers["access-control-allow-origin"], "*");
    }
}

#[tokio::test]
async fn test_missing_key_replies_with_hint() {
    for (uri, binding) in [
        (HTTP_FUNCTION_PATH, Binding::HttpFunction),
        (CLOUD_FUNCTION_PATH, Binding::CloudFunction),
    ] {
        let app = app_with(Config::default());
        let (status, json) = post_json(app, uri, r#"{"message": "hello"}"#).await;
        let reply: ChatResponse = serde_json::from_value(json).unwrap();

        assert_eq!(status, StatusCode::OK);
        assert_eq!(reply.reply, binding.missing_key_hint());
    }
}

#[tokio::test]
async fn test_bindings_resolve_keys_independently() {
    let upstream = mock_upstream(ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{ "content": { "parts": [{ "text": "Hello" }] } }]
    })))
    .await;
    let cfg = Config {
        cloud_runtime_config: None,
        ..keyed_config(upstream.uri())
    };

    let (_, json) = post_json(app_with(cfg.clone()), HTTP_FUNCTION_PATH, r#"{"message": "hi"}"#).await;
    assert_eq!(json["reply"], "Hello");

    let (_, json) = post_json(app_with(cfg), CLOUD_FUNCTION_PATH, r#"{"message": "hi"}"#).await;
    assert_eq!(json["reply"], Binding::CloudFunction.missing_key_hint());
}

#[tokio::test]
async fn test_reply_is_extracted() {
    let upstream = mock_upstream(ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{ "content": { "parts": [{ "text": "Hello" }] } }]
    })))
    .await;

    for uri in [HTTP_FUNCTION_PATH, CLOUD_FUNCTION_PATH] {
        let app = app_with(keyed_config(upstream.uri()));
        let (status, json) = post_json(app, uri, r#"{"message": "When do classes start?"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({ "reply": "Hello" }));
    }
}

#[tokio::test]
async fn test_upstream_error_is_bad_gateway() {
    let upstream = mock_upstream(ResponseTemplate::new(500).set_body_string("model overloaded")).await;
    let app = app_with(keyed_config(upstream.uri()));

    let (status, json) = post_json(app, CLOUD_FUNCTION_PATH, r#"{"message": "hi"}"#).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["status"], 500);
    assert_eq!(json["details"], "model overloaded");
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_unknown_shape_is_rendered_truncated() {
    let raw = json!({ "unexpected": "x".repeat(3 * MAX_FALLBACK_CHARS) });
    let upstream = mock_upstream(ResponseTemplate::new(200).set_body_json(raw.clone())).await;
    let app = app_with(keyed_config(upstream.uri()));

    let (status, json) = post_json(app, HTTP_FUNCTION_PATH, r#"{"message": "hi"}"#).await;
    let reply = json["reply"].as_str().unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply.chars().count(), MAX_FALLBACK_CHARS);
    assert!(raw.to_string().starts_with(reply));
}

#[tokio::test]
async fn test_unreachable_upstream_is_internal_error() {
    // Nothing listens on the discard port.
    let app = app_with(keyed_config("http://127.0.0.1:9".to_string()));

    let (status, json) = post_json(app, CLOUD_FUNCTION_PATH, r#"{"message": "hi"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["detail"].is_string());
}

#[tokio::test]
async fn test_health_and_static_site() {
    let site = tempfile::tempdir().unwrap();
    std::fs::write(site.path().join("index.html"), "<h1>School</h1>").unwrap();
    let cfg = Config {
        static_dir: site.path().display().to_string(),
        ..Default::default()
    };

    let (status, _, body) = send(app_with(cfg.clone()), "GET", "/health", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");

    let (status, _, body) = send(app_with(cfg.clone()), "GET", "/index.html", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"<h1>School</h1>");

    let (status, _, _) = send(app_with(cfg), "GET", "/missing.html", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
