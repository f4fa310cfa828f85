//! LLM 类型定义

use serde::{Deserialize, Serialize};

/// 聊天消息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// 角色：system, user, assistant
    pub role: String,
    /// 消息内容
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// 聊天选项
#[derive(Debug, Clone, Default)]
pub struct ChatOptions {
    /// 温度参数
    pub temperature: Option<f64>,
    /// 最大 token 数
    pub max_tokens: Option<u32>,
    /// 超时时间（秒）
    pub timeout: Option<u64>,
}

/// 一次非流式补全的结果
#[derive(Debug, Clone, Default)]
pub struct ChatCompletion {
    /// 回复文本
    pub content: String,
    /// 完成原因
    pub finish_reason: Option<String>,
    /// 服务端统计的总 token 数
    pub total_tokens: Option<u32>,
}

/// LLM 错误类型
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// HTTP 请求错误
    #[error("HTTP 请求失败: {0}")]
    HttpError(#[from] reqwest::Error),

    /// API 返回错误
    #[error("API 错误 ({status}): {message}")]
    ApiError { status: u16, message: String },

    /// 配置错误
    #[error("配置错误: {0}")]
    ConfigError(String),

    /// JSON 解析错误
    #[error("JSON 解析失败: {0}")]
    JsonError(#[from] serde_json::Error),

    /// 响应中没有可用内容
    #[error("模型未返回任何内容")]
    EmptyResponse,
}

impl LlmError {
    /// 用于请求日志的错误类别
    pub fn kind(&self) -> &'static str {
        match self {
            LlmError::HttpError(_) => "http",
            LlmError::ApiError { .. } => "api",
            LlmError::ConfigError(_) => "config",
            LlmError::JsonError(_) => "json",
            LlmError::EmptyResponse => "empty_response",
        }
    }

    /// HTTP 状态码（如果有）
    pub fn status_code(&self) -> Option<u16> {
        match self {
            LlmError::ApiError { status, .. } => Some(*status),
            LlmError::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
