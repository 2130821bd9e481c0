//! HTTP 请求处理器
//!
//! 处理器只做参数解析与结果包装，业务逻辑都在 services / store 层。

use axum::extract::{Multipart, Query, State};
use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::api::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{CheckResult, ExamRequest, Question, QuestionType, SubmittedAnswer};
use crate::services;
use crate::utils::logging::truncate_text;

/// 解析生成失败时返回的占位文本
const NO_EXPLANATION_PLACEHOLDER: &str = "暂无解析";

/// 随机取题的查询参数
#[derive(Debug, Deserialize)]
pub struct QuestionQuery {
    /// 逗号分隔的题型列表，如 `fill_blank,multiple_choice`
    pub question_types: Option<String>,
    pub topic: Option<String>,
}

/// GET /
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "欢迎使用知识测验 API" }))
}

/// GET /get-question
pub async fn get_question(
    State(state): State<AppState>,
    Query(params): Query<QuestionQuery>,
) -> AppResult<Json<Question>> {
    let types = parse_type_filter(params.question_types.as_deref())?;

    state
        .bank
        .get_random_question(types.as_deref(), params.topic.as_deref())
        .await
        .map(Json)
        .ok_or_else(|| AppError::not_found("未找到任何题目"))
}

/// POST /check-answer
pub async fn check_answer(
    State(state): State<AppState>,
    Json(submitted): Json<SubmittedAnswer>,
) -> AppResult<Json<CheckResult>> {
    let question = state
        .bank
        .get_question_by_id(submitted.question_id)
        .ok_or_else(|| AppError::not_found("未找到题目"))?;

    info!(
        "📝 判题: 题目 {} ({})",
        question.id,
        truncate_text(&question.stem, 40)
    );

    let result = services::check_answer(&question, &submitted.answer);
    Ok(Json(result))
}

/// POST /get-explanation
pub async fn get_explanation(
    State(state): State<AppState>,
    Json(submitted): Json<SubmittedAnswer>,
) -> AppResult<Json<Value>> {
    let question = state
        .bank
        .get_question_by_id(submitted.question_id)
        .ok_or_else(|| AppError::not_found("未找到题目"))?;

    // 生成故障在服务内部降级，这里只会拿到占位文本
    let explanation = state
        .explain
        .generate_explanation(&question)
        .await
        .unwrap_or_else(|| NO_EXPLANATION_PLACEHOLDER.to_string());

    Ok(Json(json!({ "explanation": explanation })))
}

/// POST /generate-exam
pub async fn generate_exam(
    State(state): State<AppState>,
    Json(request): Json<ExamRequest>,
) -> AppResult<Json<Vec<Question>>> {
    info!(
        "📋 组卷请求: {} 题, 题型 {:?}, 主题 {:?}",
        request.num_questions, request.question_types, request.topic
    );

    let questions = services::assemble_exam(&state.bank, &request).await?;
    Ok(Json(questions))
}

/// POST /upload-exam
pub async fn upload_exam(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<Vec<Question>>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::invalid_input(format!("无法读取上传内容: {}", e)))?
    {
        let Some(file_name) = field.file_name().map(|s| s.to_string()) else {
            continue;
        };

        if !file_name.to_lowercase().ends_with(".pdf") {
            return Err(AppError::invalid_input("只支持 .pdf 文件"));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::invalid_input(format!("无法读取上传内容: {}", e)))?;

        info!("📤 收到上传文档: {} ({} 字节)", file_name, data.len());

        let questions = state.ingest.ingest(&state.bank, &data).await?;
        return Ok(Json(questions));
    }

    Err(AppError::invalid_input("请上传 PDF 文件"))
}

/// 解析逗号分隔的题型筛选参数
fn parse_type_filter(raw: Option<&str>) -> AppResult<Option<Vec<QuestionType>>> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    let mut types = Vec::new();
    for token in raw.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let qt = QuestionType::from_value(token)
            .ok_or_else(|| AppError::invalid_input(format!("未知题型: {}", token)))?;
        types.push(qt);
    }

    Ok(if types.is_empty() { None } else { Some(types) })
}
