//! HTTP 服务 - Kore webhook 入口和反馈提交

use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use super::adapter::{format_reply, parse_payload, KoreReply};
use super::error::{panic_response, ApiError, ApiResult};
use crate::notification::dispatcher::Dispatcher;
use crate::notification::event::Category;

/// 共享状态
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }
}

/// 创建路由
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/kore-webhook", post(kore_webhook))
        .route("/feedback", post(submit_feedback))
        .route("/engagement/:user_id", get(user_engagement))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(panic_response))
}

/// 绑定监听地址，host 可以是 IP 或主机名（如 localhost）
pub async fn bind(host: &str, port: u16) -> Result<TcpListener> {
    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", host, port))?;
    Ok(listener)
}

/// 启动服务，直到收到 Ctrl+C / SIGTERM
pub async fn serve(host: &str, port: u16, state: AppState) -> Result<()> {
    let app = create_router(state);
    let listener = bind(host, port).await?;
    let addr = listener.local_addr()?;
    info!(%addr, "Webhook server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Webhook server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// POST /kore-webhook
///
/// 评分并决定是否回复文案；不发送时回复空字符串。
pub async fn kore_webhook(State(state): State<AppState>, body: Bytes) -> ApiResult<Json<KoreReply>> {
    let payload: Value = serde_json::from_slice(&body)
        .map_err(|e| ApiError::internal(format!("Invalid JSON payload: {}", e)))?;
    if !payload.is_object() {
        return Err(ApiError::internal("Payload must be a JSON object"));
    }
    debug!(payload = %payload, "Received Kore event");

    let event = parse_payload(&payload);
    let outcome = state.dispatcher.handle_event(&event).await;

    Ok(Json(format_reply(outcome.message().unwrap_or_default())))
}

/// 反馈提交请求
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    pub user_id: String,
    pub event_type: String,
    pub clicked: bool,
}

/// POST /feedback
pub async fn submit_feedback(State(state): State<AppState>, body: Bytes) -> ApiResult<StatusCode> {
    let request: FeedbackRequest = serde_json::from_slice(&body)
        .map_err(|e| ApiError::bad_request(format!("Invalid feedback request: {}", e)))?;

    let category = Category::parse(&request.event_type);
    state
        .dispatcher
        .submit_feedback(&request.user_id, &category, request.clicked)?;

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementEntry {
    pub category: Category,
    pub clicks: u64,
    pub total: u64,
    pub click_rate: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementResponse {
    pub user_id: String,
    pub records: Vec<EngagementEntry>,
}

/// GET /engagement/:user_id
pub async fn user_engagement(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<EngagementResponse> {
    let records = state
        .dispatcher
        .store()
        .user_records(&user_id)
        .into_iter()
        .map(|(category, record)| EngagementEntry {
            category,
            clicks: record.clicks,
            total: record.total,
            click_rate: record.click_rate(),
        })
        .collect();

    Json(EngagementResponse { user_id, records })
}
