use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use tracing::error;

use crate::clients::llm_client::GenerateError;
use crate::clients::pdf_extractor::ExtractError;

/// 应用程序错误类型
///
/// 三类错误对应三种对外表现：
/// - `NotFound` → 404，附带可读信息
/// - `InvalidInput` → 400，附带可读信息
/// - `Service` → 外部服务故障，调用点通常就地降级，不应到达 HTTP 层
#[derive(Debug)]
pub enum AppError {
    /// 资源不存在（未知题目 ID、空结果集）
    NotFound(String),
    /// 调用方输入不合法（非正数量、非 PDF 上传）
    InvalidInput(String),
    /// 外部服务故障（生成 / 提取）
    Service(ServiceError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "{}", msg),
            AppError::InvalidInput(msg) => write!(f, "{}", msg),
            AppError::Service(e) => write!(f, "外部服务故障: {}", e),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Service(e) => Some(e),
            _ => None,
        }
    }
}

/// 外部服务错误
#[derive(Debug)]
pub enum ServiceError {
    /// 文本生成服务错误
    Generate(GenerateError),
    /// 文本提取错误
    Extract(ExtractError),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Generate(e) => write!(f, "{}", e),
            ServiceError::Extract(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServiceError::Generate(e) => Some(e),
            ServiceError::Extract(e) => Some(e),
        }
    }
}

impl From<GenerateError> for AppError {
    fn from(err: GenerateError) -> Self {
        AppError::Service(ServiceError::Generate(err))
    }
}

impl From<ExtractError> for AppError {
    fn from(err: ExtractError) -> Self {
        AppError::Service(ServiceError::Extract(err))
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建 NotFound 错误
    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    /// 创建 InvalidInput 错误
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        AppError::InvalidInput(msg.into())
    }
}

// ========== HTTP 响应转换 ==========

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Service(_) => StatusCode::BAD_GATEWAY,
        };

        // 外部服务故障理应在调用点就地降级，走到这里说明有遗漏
        if status == StatusCode::BAD_GATEWAY {
            error!("未降级的外部服务故障: {}", self);
        }

        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
