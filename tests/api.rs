//! HTTP API tests.
//!
//! Drive the router end to end over a SQLite store in a temp dir.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use knowledge_extractor::llm::{
    AnalysisProvider, LlmConfig, LlmError, RemoteProvider, ResilientProvider, StubProvider,
};
use knowledge_extractor::models::AnalysisResult;
use knowledge_extractor::repository::{AnalysisStore, SqliteAnalysisStore};
use knowledge_extractor::server::{create_router, AppState};

/// Provider returning fixed topics and keywords.
struct Tagged {
    topics: Vec<String>,
    keywords: Vec<String>,
}

#[async_trait]
impl AnalysisProvider for Tagged {
    fn name(&self) -> &str {
        "tagged"
    }

    async fn analyze(&self, _text: &str) -> Result<AnalysisResult, LlmError> {
        Ok(AnalysisResult {
            summary: "tagged summary".to_string(),
            title: "tagged".to_string(),
            topics: self.topics.clone(),
            sentiment: "positive".to_string(),
            keywords: self.keywords.clone(),
            confidence: 0.5,
        })
    }
}

fn tagged(topics: &[&str], keywords: &[&str]) -> Arc<dyn AnalysisProvider> {
    Arc::new(Tagged {
        topics: topics.iter().map(|s| s.to_string()).collect(),
        keywords: keywords.iter().map(|s| s.to_string()).collect(),
    })
}

async fn setup(provider: Arc<dyn AnalysisProvider>) -> (Router, Arc<dyn AnalysisStore>, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("api.db");
    let store = SqliteAnalysisStore::open(&db_path.display().to_string());
    store.init_schema().await.unwrap();
    let store: Arc<dyn AnalysisStore> = Arc::new(store);

    let app = create_router(AppState::new(provider, store.clone()));
    (app, store, dir)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

fn post_analyze(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/analyze")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_analyze_returns_full_record() {
    let (app, _store, _dir) = setup(Arc::new(StubProvider)).await;

    let text = "  Go is fast.\n\tGo is simple.  ";
    let (status, first) = send(&app, post_analyze(&json!({ "text": text }).to_string())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["raw_text"], text);
    assert_eq!(first["summary"], "mock summary");
    assert_eq!(first["title"], "mock title");
    assert_eq!(first["topics"], json!(["mock", "topic"]));
    assert_eq!(first["sentiment"], "neutral");
    assert_eq!(first["keywords"], json!(["keyword"]));
    assert_eq!(first["confidence"], 0.99);
    assert!(first["created_at"].is_string());

    let id = first["id"].as_str().unwrap();
    assert!(uuid::Uuid::parse_str(id).is_ok());

    let (_, second) = send(&app, post_analyze(&json!({ "text": text }).to_string())).await;
    assert_ne!(second["id"], first["id"]);
}

#[tokio::test]
async fn test_analyze_rejects_empty_text() {
    let (app, store, _dir) = setup(Arc::new(StubProvider)).await;

    let (status, json) = send(&app, post_analyze(r#"{"text": ""}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "text is required");

    assert!(store.search("mock").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_analyze_accepts_whitespace_text_verbatim() {
    let (app, _store, _dir) = setup(Arc::new(StubProvider)).await;

    let (status, json) = send(&app, post_analyze(r#"{"text": "   "}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["raw_text"], "   ");
}

/// Stub provider that takes a while to answer.
struct Slow;

#[async_trait]
impl AnalysisProvider for Slow {
    fn name(&self) -> &str {
        "slow"
    }

    async fn analyze(&self, _text: &str) -> Result<AnalysisResult, LlmError> {
        tokio::time::sleep(Duration::from_millis(300)).await;
        Ok(StubProvider::canned())
    }
}

#[tokio::test]
async fn test_client_disconnect_still_stores_analysis() {
    let (app, store, _dir) = setup(Arc::new(Slow)).await;

    let request = app.clone().oneshot(post_analyze(r#"{"text": "hello"}"#));
    let dropped = tokio::time::timeout(Duration::from_millis(50), request).await;
    assert!(dropped.is_err(), "request should still be in flight");

    tokio::time::sleep(Duration::from_millis(800)).await;
    let stored = store.search("mock").await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].raw_text, "hello");
}

#[tokio::test]
async fn test_analyze_rejects_malformed_body() {
    let (app, _store, _dir) = setup(Arc::new(StubProvider)).await;

    for body in ["not json", "{}", r#"{"text": 42}"#] {
        let (status, json) = send(&app, post_analyze(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
        assert!(json["error"].as_str().unwrap().contains("invalid request body"));
    }
}

#[tokio::test]
async fn test_analyze_wrong_method() {
    let (app, _store, _dir) = setup(Arc::new(StubProvider)).await;
    let (status, json) = send(&app, get("/analyze")).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(json["error"], "method not allowed");

    let request = Request::builder()
        .method("POST")
        .uri("/search?topic=go")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(&app, request).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(json["error"], "method not allowed");
}

#[tokio::test]
async fn test_failing_primary_falls_back_to_stub() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/responses")
        .with_status(500)
        .with_body("upstream down")
        .expect(1)
        .create_async()
        .await;

    let remote = RemoteProvider::new(
        LlmConfig::default()
            .with_endpoint(&server.url())
            .with_api_key("sk-test"),
    )
    .unwrap();
    let provider = ResilientProvider::new(Arc::new(remote), Arc::new(StubProvider));
    let (app, _store, _dir) = setup(Arc::new(provider)).await;

    let (status, json) = send(&app, post_analyze(r#"{"text": "hello"}"#)).await;
    mock.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["summary"], "mock summary");
    assert_eq!(json["confidence"], 0.99);
}

#[tokio::test]
async fn test_provider_failure_without_fallback_is_500() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1/responses")
        .with_status(503)
        .create_async()
        .await;

    let remote = RemoteProvider::new(
        LlmConfig::default()
            .with_endpoint(&server.url())
            .with_api_key("sk-test"),
    )
    .unwrap();
    let (app, _store, _dir) = setup(Arc::new(remote)).await;

    let (status, json) = send(&app, post_analyze(r#"{"text": "hello"}"#)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["error"].as_str().unwrap().contains("503"));
}

#[tokio::test]
async fn test_search_scenario() {
    let (app, _store, _dir) = setup(tagged(&["go", "cloud"], &["fast"])).await;

    let (_, stored) = send(&app, post_analyze(r#"{"text": "Go in the cloud"}"#)).await;

    let (status, results) = send(&app, get("/search?topic=go")).await;
    assert_eq!(status, StatusCode::OK);
    let results = results.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0], stored);
    assert_eq!(results[0]["topics"], json!(["go", "cloud"]));

    let (status, results) = send(&app, get("/search?topic=fast")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(results.as_array().unwrap().len(), 1);

    let (status, results) = send(&app, get("/search?topic=nomatch")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(results, json!([]));
}

#[tokio::test]
async fn test_search_round_trips_topic_order() {
    let (app, _store, _dir) = setup(tagged(&["ai", "infra"], &[])).await;
    send(&app, post_analyze(r#"{"text": "models on clusters"}"#)).await;

    let (_, results) = send(&app, get("/search?topic=ai")).await;
    assert_eq!(results[0]["topics"], json!(["ai", "infra"]));
    assert_eq!(results[0]["keywords"], json!([]));
}

#[tokio::test]
async fn test_search_is_token_exact() {
    let (app, _store, _dir) = setup(tagged(&["mango"], &["gopher"])).await;
    send(&app, post_analyze(r#"{"text": "fruit"}"#)).await;

    let (status, results) = send(&app, get("/search?topic=go")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(results, json!([]));
}

#[tokio::test]
async fn test_search_requires_topic() {
    let (app, _store, _dir) = setup(Arc::new(StubProvider)).await;

    for uri in ["/search", "/search?topic=", "/search?topic=%20%20"] {
        let (status, json) = send(&app, get(uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "uri: {uri}");
        assert!(json["error"].is_string());
    }
}

#[tokio::test]
async fn test_get_analysis_by_id() {
    let (app, _store, _dir) = setup(Arc::new(StubProvider)).await;
    let (_, stored) = send(&app, post_analyze(r#"{"text": "hello"}"#)).await;

    let uri = format!("/analyses/{}", stored["id"].as_str().unwrap());
    let (status, fetched) = send(&app, get(&uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, stored);

    let (status, json) = send(&app, get("/analyses/does-not-exist")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_health_and_openapi() {
    let (app, _store, _dir) = setup(Arc::new(StubProvider)).await;

    let (status, json) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["backend"], "sqlite");

    let (status, spec) = send(&app, get("/api/openapi.json")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(spec["paths"]["/analyze"].is_object());
    assert!(spec["paths"]["/search"].is_object());
    assert!(spec["components"]["schemas"]["ErrorBody"].is_object());
    assert!(spec["components"]["schemas"]["Analysis"].is_object());
    assert!(spec["paths"]["/analyze"]["post"]["responses"]["400"].is_object());
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (app, _store, _dir) = setup(Arc::new(StubProvider)).await;
    let (status, json) = send(&app, get("/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "not found");
}
