//! LLM 客户端

use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use super::format::build_openai_endpoint;
use super::openai::complete_openai;
use super::types::{ChatCompletion, ChatMessage, ChatOptions, LlmError};
use crate::utils::RequestLogger;

/// 聊天补全后端
///
/// 阅读分析服务只依赖这个 trait，测试中可替换为本地实现。
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// 发送一次补全请求，返回第一条回复
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        model: &str,
        options: ChatOptions,
    ) -> Result<ChatCompletion, LlmError>;

    /// 实际请求的端点，用于展示
    fn endpoint(&self) -> &str;
}

/// OpenAI 兼容的 LLM 客户端
pub struct LlmClient {
    client: Client,
    api_key: String,
    endpoint: String,
    request_logger: Option<Arc<RequestLogger>>,
}

impl LlmClient {
    /// 创建新的 LLM 客户端
    pub fn new(api_key: impl Into<String>, base_url: &str) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(LlmError::ConfigError("API Key is required".to_string()));
        }

        // 不设置整体超时：分析长文章时模型可能需要较长时间
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(5)
            .build()
            .map_err(LlmError::HttpError)?;

        Ok(Self {
            client,
            api_key,
            endpoint: build_openai_endpoint(base_url),
            request_logger: None,
        })
    }

    /// 启用 JSONL 请求日志
    pub fn with_request_logger(mut self, logger: Arc<RequestLogger>) -> Self {
        self.request_logger = Some(logger);
        self
    }
}

#[async_trait]
impl ChatBackend for LlmClient {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        model: &str,
        options: ChatOptions,
    ) -> Result<ChatCompletion, LlmError> {
        info!(
            "LLM request: model={}, messages={}, max_tokens={:?}",
            model,
            messages.len(),
            options.max_tokens
        );

        let start = Instant::now();
        let entry = self.request_logger.as_ref().map(|logger| {
            logger.log_request(
                &self.endpoint,
                &self.api_key,
                model,
                &messages,
                options.temperature,
                options.max_tokens,
            )
        });

        let result = complete_openai(
            &self.client,
            &self.api_key,
            &self.endpoint,
            &messages,
            model,
            &options,
        )
        .await;

        match &result {
            Ok(completion) => {
                info!(
                    "LLM response: chars={}, finish_reason={:?}, total_tokens={:?}, elapsed_ms={}",
                    completion.content.chars().count(),
                    completion.finish_reason,
                    completion.total_tokens,
                    start.elapsed().as_millis()
                );
                if completion.finish_reason.as_deref() == Some("length") {
                    warn!("LLM response was cut off by max_tokens");
                }
                if let (Some(logger), Some(entry)) = (&self.request_logger, entry) {
                    logger.log_success(entry, start, &completion.content);
                }
            }
            Err(e) => {
                warn!("LLM request failed: {}", e);
                if let (Some(logger), Some(entry)) = (&self.request_logger, entry) {
                    logger.log_error(entry, start, e.kind(), &e.to_string(), e.status_code());
                }
            }
        }

        result
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_requires_api_key() {
        assert!(matches!(
            LlmClient::new("", "https://api.deepseek.com/v1"),
            Err(LlmError::ConfigError(_))
        ));
    }

    #[test]
    fn test_endpoint_is_derived_from_base_url() {
        let client = LlmClient::new("sk-test", "https://api.deepseek.com/v1/").unwrap();
        assert_eq!(client.endpoint(), "https://api.deepseek.com/v1/chat/completions");
    }
}
