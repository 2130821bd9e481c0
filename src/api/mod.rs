//! HTTP 接口层
//!
//! 路由与处理器。跨域放开（前端独立部署），所有请求走 trace 层。

pub mod handlers;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::services::{ExplainService, IngestService};
use crate::store::QuestionBank;

/// 请求处理器共享的应用状态
#[derive(Clone)]
pub struct AppState {
    pub bank: Arc<QuestionBank>,
    pub explain: Arc<ExplainService>,
    pub ingest: Arc<IngestService>,
}

/// 构建路由
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/get-question", get(handlers::get_question))
        .route("/check-answer", post(handlers::check_answer))
        .route("/get-explanation", post(handlers::get_explanation))
        .route("/generate-exam", post(handlers::generate_exam))
        .route("/upload-exam", post(handlers::upload_exam))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
