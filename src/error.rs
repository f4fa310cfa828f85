//! 统一错误处理模块
//!
//! 定义应用级错误类型，并实现 axum 的 IntoResponse trait 以便自动转换为 HTTP 响应。

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm::LlmError;
use crate::services::NormalizeError;

/// 应用错误枚举
#[derive(Error, Debug)]
pub enum AppError {
    /// 配置相关错误（缺少 API 密钥等）
    #[error("配置错误: {0}")]
    Config(String),

    /// LLM 调用错误
    #[error("LLM 错误: {0}")]
    Llm(String),

    /// 模型返回的内容不是合法 JSON
    #[error("解析失败: {0}")]
    Decode(String),

    /// 模型返回的 JSON 结构不符合要求
    #[error("结构错误: {0}")]
    Schema(String),

    /// 请求参数错误
    #[error("请求错误: {0}")]
    BadRequest(String),

    /// 资源未找到
    #[error("未找到: {0}")]
    NotFound(String),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Llm(_) | AppError::Decode(_) | AppError::Schema(_) => StatusCode::BAD_GATEWAY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::ConfigError(msg) => AppError::Config(msg),
            other => AppError::Llm(other.to_string()),
        }
    }
}

impl From<NormalizeError> for AppError {
    fn from(err: NormalizeError) -> Self {
        match err {
            NormalizeError::Decode(msg) => AppError::Decode(msg),
            NormalizeError::Schema(msg) => AppError::Schema(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = Json(json!({
            "success": false,
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

/// 便捷类型别名
pub type AppResult<T> = Result<T, AppError>;
