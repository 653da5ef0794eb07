//! Webhook 路由测试

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use bot_optimizer::notification::{Category, EngagementStore, FeedbackMode};
use bot_optimizer::{create_router, AppState, AppConfig, DispatcherBuilder};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app(store: Arc<EngagementStore>, feedback: FeedbackMode) -> Router {
    let dispatcher = DispatcherBuilder::new(AppConfig::default())
        .store(store)
        .feedback(feedback)
        .enable_kore(false)
        .build()
        .unwrap();
    create_router(AppState::new(dispatcher))
}

async fn post(app: Router, uri: &str, body: impl Into<Body>) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(body.into())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn engaged_store() -> Arc<EngagementStore> {
    let store = Arc::new(EngagementStore::new());
    for i in 0..10 {
        store.record("alice@example.com", &Category::PaymentFailed, i < 8);
    }
    store
}

#[tokio::test]
async fn test_webhook_skipped_returns_empty_text() {
    let store = Arc::new(EngagementStore::new());
    let payload = json!({"userId": "u1", "eventType": "payment_failed", "parameters": {"amount": 99}});

    let (status, body) = post(app(store.clone(), FeedbackMode::AssumeIgnored), "/kore-webhook", payload.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "response": {"text": "", "type": "text"},
            "context": {},
            "expectUserResponse": true
        })
    );
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_webhook_notified_returns_message_and_records() {
    let store = engaged_store();
    let payload = json!({
        "userInfo": {"email": "alice@example.com"},
        "eventType": "payment_failed"
    });

    let (status, body) = post(app(store.clone(), FeedbackMode::AssumeIgnored), "/kore-webhook", payload.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["response"]["text"],
        "Your recent payment failed. Want to try another card?"
    );
    assert_eq!(body["expectUserResponse"], true);
    let record = store.get("alice@example.com", &Category::PaymentFailed).unwrap();
    assert_eq!((record.clicks, record.total), (8, 11));
}

#[tokio::test]
async fn test_webhook_tolerates_missing_fields() {
    let store = Arc::new(EngagementStore::new());
    let (status, body) = post(app(store, FeedbackMode::AssumeIgnored), "/kore-webhook", "{}").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"]["text"], "");
}

#[tokio::test]
async fn test_webhook_invalid_json_is_500() {
    let store = Arc::new(EngagementStore::new());
    let (status, body) = post(app(store.clone(), FeedbackMode::AssumeIgnored), "/kore-webhook", "not json").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("Invalid JSON"));
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_webhook_non_object_is_500() {
    let store = Arc::new(EngagementStore::new());
    let (status, body) = post(app(store, FeedbackMode::AssumeIgnored), "/kore-webhook", "[1, 2]").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_deferred_feedback_flow() {
    let store = engaged_store();
    let router = app(store.clone(), FeedbackMode::Deferred);
    let event = json!({"userId": "alice@example.com", "eventType": "payment_failed"});
    let feedback = json!({"userId": "alice@example.com", "eventType": "payment_failed", "clicked": true});

    let (status, body) = post(router.clone(), "/kore-webhook", event.to_string()).await;
    assert_eq!(status, StatusCode::OK);
    assert_ne!(body["response"]["text"], "");
    // 反馈提交前不记录
    assert_eq!(store.get("alice@example.com", &Category::PaymentFailed).unwrap().total, 10);

    let (status, _) = post(router.clone(), "/feedback", feedback.to_string()).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let record = store.get("alice@example.com", &Category::PaymentFailed).unwrap();
    assert_eq!((record.clicks, record.total), (9, 11));

    let (status, body) = post(router, "/feedback", feedback.to_string()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
    assert_eq!(store.get("alice@example.com", &Category::PaymentFailed).unwrap().total, 11);
}

#[tokio::test]
async fn test_feedback_malformed_is_400() {
    let store = Arc::new(EngagementStore::new());
    let (status, body) = post(app(store, FeedbackMode::Deferred), "/feedback", r#"{"userId": "u"}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_engagement_snapshot_and_health() {
    let store = engaged_store();
    let router = app(store, FeedbackMode::Deferred);

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/engagement/alice@example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["userId"], "alice@example.com");
    assert_eq!(
        body["records"],
        json!([{"category": "payment_failed", "clicks": 8, "total": 10, "clickRate": 0.8}])
    );

    let response = router
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
