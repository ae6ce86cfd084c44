//! Router-level tests with in-memory stores and no provider credentials.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use vnation_api::{create_router, AccountService, ApiConfig, AppState};
use vnation_providers::{
    refine_locally, FalConfig, FalVideoProvider, GeminiConfig, GeminiRefiner,
    GenerationOrchestrator, TextRefiner, PLACEHOLDER_VIDEO_URL,
};
use vnation_store::{MemoryJobStore, MemoryUserStore};

struct TagRefiner;

#[async_trait]
impl TextRefiner for TagRefiner {
    async fn refine(&self, prompt: &str) -> String {
        format!("{} [refined]", prompt)
    }
}

struct PanickingRefiner;

#[async_trait]
impl TextRefiner for PanickingRefiner {
    async fn refine(&self, _prompt: &str) -> String {
        panic!("refiner contract violated")
    }
}

fn test_config() -> ApiConfig {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..");
    ApiConfig {
        templates_dir: root.join("templates"),
        static_dir: root.join("static"),
        mock_videos_dir: root.join("mockvideos"),
        ..ApiConfig::default()
    }
}

fn build_app(refiner: Arc<dyn TextRefiner>, accounts: Option<AccountService>) -> Router {
    // No FAL key, so every generation takes the mock path.
    let video = Arc::new(FalVideoProvider::new(FalConfig::default()));
    let orchestrator = GenerationOrchestrator::new(video, refiner);
    let state = AppState::from_parts(
        test_config(),
        orchestrator,
        Arc::new(MemoryJobStore::new()),
        accounts,
    );
    create_router(state, None)
}

fn app_with_accounts() -> Router {
    let accounts = AccountService::new(Arc::new(MemoryUserStore::new()));
    build_app(Arc::new(TagRefiner), Some(accounts))
}

fn app() -> Router {
    build_app(Arc::new(TagRefiner), None)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_generate_without_credential_serves_mock_video() {
    let app = app();

    let response = app
        .clone()
        .oneshot(post_json("/generate", serde_json::json!({ "prompt": "sunset" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["video_url"], PLACEHOLDER_VIDEO_URL);
    assert!(json["message"].as_str().unwrap().contains("mock"));
    let job_id = json["job_id"].as_str().unwrap().to_string();
    assert!(!job_id.is_empty());

    // The result is recorded and visible through /status.
    let response = app
        .oneshot(get(&format!("/status/{}", job_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let job = body_json(response).await;
    assert_eq!(job["job_id"], job_id.as_str());
    assert_eq!(job["provider"], "mock");
    assert_eq!(job["video_url"], PLACEHOLDER_VIDEO_URL);
    assert_eq!(job["meta"]["prompt"], "sunset");
}

#[tokio::test]
async fn test_generate_each_call_gets_new_job_id() {
    let app = app();
    let mut ids = Vec::new();

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(post_json("/generate", serde_json::json!({ "prompt": "sunset" })))
            .await
            .unwrap();
        ids.push(body_json(response).await["job_id"].clone());
    }

    assert_ne!(ids[0], ids[1]);
}

#[tokio::test]
async fn test_generate_blank_prompt_is_not_rejected() {
    let response = app()
        .oneshot(post_json("/generate", serde_json::json!({ "prompt": "   " })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["video_url"], PLACEHOLDER_VIDEO_URL);
    assert!(json["message"]
        .as_str()
        .unwrap()
        .starts_with("API unavailable or failed"));
}

#[tokio::test]
async fn test_status_unknown_job() {
    let response = app().oneshot(get("/status/does-not-exist")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["detail"], "Job not found");
}

#[tokio::test]
async fn test_refine_returns_original_and_refined() {
    let response = app()
        .oneshot(post_json(
            "/refine",
            serde_json::json!({ "prompt": "sunset", "style": "noir" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["original_prompt"], "sunset");
    assert_eq!(json["refined_prompt"], "sunset\nStyle: noir [refined]");
}

#[tokio::test]
async fn test_refine_without_credential_is_local() {
    let refiner = Arc::new(GeminiRefiner::new(GeminiConfig::default()));
    let app = build_app(refiner, None);

    let response = app
        .oneshot(post_json(
            "/refine",
            serde_json::json!({
                "prompt": "A lone wolf on a hill",
                "style": "watercolor",
                "aspect": "16:9"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let expected = refine_locally("A lone wolf on a hill\nStyle: watercolor\nAspect: 16:9");
    assert_eq!(json["refined_prompt"], expected.as_str());
    assert!(expected.ends_with('.'));
}

#[tokio::test]
async fn test_refine_contract_violation_is_500() {
    let response = build_app(Arc::new(PanickingRefiner), None)
        .oneshot(post_json("/refine", serde_json::json!({ "prompt": "sunset" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert!(json["detail"].as_str().unwrap().starts_with("Refine failed:"));
}

#[tokio::test]
async fn test_signup_then_login() {
    let app = app_with_accounts();

    let response = app
        .clone()
        .oneshot(post_form(
            "/api/signup",
            "name=Ada&email=ada%40example.com&password=s3cret",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["message"],
        "Signup successful. Please login."
    );

    let response = app
        .oneshot(post_form("/api/login", "email=ada%40example.com&password=s3cret"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "Login successful");
}

#[tokio::test]
async fn test_duplicate_signup_rejected() {
    let app = app_with_accounts();
    let form = "name=Ada&email=ada%40example.com&password=s3cret";

    let first = app.clone().oneshot(post_form("/api/signup", form)).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app.oneshot(post_form("/api/signup", form)).await.unwrap();
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(second).await["error"], "User already exists");
}

#[tokio::test]
async fn test_login_rejections_share_one_message() {
    let app = app_with_accounts();
    app.clone()
        .oneshot(post_form(
            "/api/signup",
            "name=Ada&email=ada%40example.com&password=s3cret",
        ))
        .await
        .unwrap();

    let wrong_password = app
        .clone()
        .oneshot(post_form("/api/login", "email=ada%40example.com&password=nope"))
        .await
        .unwrap();
    assert_eq!(wrong_password.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(wrong_password).await["error"], "Invalid credentials");

    let unknown_user = app
        .oneshot(post_form("/api/login", "email=bob%40example.com&password=s3cret"))
        .await
        .unwrap();
    assert_eq!(unknown_user.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(unknown_user).await["error"], "Invalid credentials");
}

#[tokio::test]
async fn test_accounts_unavailable_without_store() {
    let app = app();

    let response = app
        .clone()
        .oneshot(post_form("/api/login", "email=ada%40example.com&password=s3cret"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        body_json(response).await["detail"],
        "Account store not configured"
    );

    // Generation is unaffected.
    let response = app
        .oneshot(post_json("/generate", serde_json::json!({ "prompt": "sunset" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health_sets_request_id_and_security_headers() {
    let response = app().oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert!(headers.get("x-request-id").is_some());
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");

    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let request = Request::builder()
        .uri("/healthz")
        .header("X-Request-ID", "req-123")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.headers().get("x-request-id").unwrap(), "req-123");
}

#[tokio::test]
async fn test_ready_with_memory_stores() {
    let response = app().oneshot(get("/ready")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ready");
    assert_eq!(json["checks"]["jobs"]["status"], "ok");
    assert_eq!(json["checks"]["accounts"]["status"], "disabled");
}

#[tokio::test]
async fn test_index_page_is_served() {
    let response = app().oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers().get(header::CONTENT_TYPE).unwrap();
    assert!(content_type.to_str().unwrap().starts_with("text/html"));
}

#[tokio::test]
async fn test_metrics_route_absent_when_disabled() {
    let response = app().oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
