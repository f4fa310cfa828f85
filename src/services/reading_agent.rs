//! 阅读分析服务
//!
//! 串起 prompt 构建、LLM 调用和响应规范化。每次操作只调用一次模型，失败不重试。

use std::sync::Arc;
use tracing::{info, warn};

use super::prompt_service::PromptService;
use super::response_normalizer::normalize_analysis;
use crate::error::AppError;
use crate::llm::{ChatBackend, ChatMessage, ChatOptions};
use crate::models::{AnalysisRequest, AnalysisResult};

/// 结构化分析调用参数：较低温度，较大输出上限以容纳长 JSON
const ANALYSIS_TEMPERATURE: f64 = 0.3;
const ANALYSIS_MAX_TOKENS: u32 = 8100;

/// 追问调用参数
const FOLLOW_UP_TEMPERATURE: f64 = 0.5;
const FOLLOW_UP_MAX_TOKENS: u32 = 2000;

/// 连接测试
const TEST_MESSAGE: &str = "Hello, this is a test.";
const TEST_MAX_TOKENS: u32 = 10;

/// 阅读分析服务
pub struct ReadingAgent {
    backend: Arc<dyn ChatBackend>,
    prompts: PromptService,
    model: String,
    timeout: Option<u64>,
}

impl ReadingAgent {
    pub fn new(backend: Arc<dyn ChatBackend>, model: impl Into<String>) -> Self {
        Self {
            backend,
            prompts: PromptService::new(),
            model: model.into(),
            timeout: None,
        }
    }

    /// 设置单次请求超时（秒）
    pub fn with_timeout(mut self, timeout: Option<u64>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> &str {
        self.backend.endpoint()
    }

    pub fn prompts(&self) -> &PromptService {
        &self.prompts
    }

    /// 分析文章和题目
    pub async fn analyze_passage(&self, request: &AnalysisRequest) -> Result<AnalysisResult, AppError> {
        let prompt = self.prompts.build_analysis_prompt(
            &request.passage,
            &request.questions,
            &request.answers,
        );

        info!(
            "Analyzing passage: chars={}, questions={}, answers={}",
            request.passage.chars().count(),
            request.questions.len(),
            request.answers.len()
        );

        let content = self
            .send(prompt, Some(ANALYSIS_TEMPERATURE), ANALYSIS_MAX_TOKENS)
            .await?;

        let result = normalize_analysis(&content).map_err(|e| {
            warn!("Failed to normalize analysis response: {}", e);
            AppError::from(e)
        })?;

        info!("Analysis parsed: {} questions", result.questions.len());
        Ok(result)
    }

    /// 回答学生的追问，返回自由文本
    pub async fn answer_question(&self, question: &str, context: &str) -> Result<String, AppError> {
        let prompt = self.prompts.build_follow_up_prompt(question, context);
        self.send(prompt, Some(FOLLOW_UP_TEMPERATURE), FOLLOW_UP_MAX_TOKENS)
            .await
    }

    /// 发送一条简单消息，确认 API 配置可用
    pub async fn test_connection(&self) -> Result<String, AppError> {
        self.send(TEST_MESSAGE.to_string(), None, TEST_MAX_TOKENS).await
    }

    async fn send(
        &self,
        prompt: String,
        temperature: Option<f64>,
        max_tokens: u32,
    ) -> Result<String, AppError> {
        let options = ChatOptions {
            temperature,
            max_tokens: Some(max_tokens),
            timeout: self.timeout,
        };

        let completion = self
            .backend
            .complete(vec![ChatMessage::user(prompt)], &self.model, options)
            .await?;

        Ok(completion.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::mock::MockBackend;

    const ANALYSIS_JSON: &str = "```json\n{\"questions\": [{\"question_number\": 1, \"correct_answer\": \"A\", \"location_sentence\": \"AI has evolved.\", \"explanation\": \"原文首句\"}]}\n```";

    fn request() -> AnalysisRequest {
        AnalysisRequest::from_raw_input("AI has evolved.", "What changed?", "A")
    }

    #[tokio::test]
    async fn test_analyze_passage_uses_analysis_parameters() {
        let backend = Arc::new(MockBackend::new(vec![Some(ANALYSIS_JSON)]));
        let agent = ReadingAgent::new(backend.clone(), "deepseek-chat");

        let result = agent.analyze_passage(&request()).await.unwrap();
        assert_eq!(result.questions.len(), 1);
        assert_eq!(result.questions[0].correct_answer, "A");

        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].model, "deepseek-chat");
        assert_eq!(calls[0].messages.len(), 1);
        assert_eq!(calls[0].messages[0].role, "user");
        assert!(calls[0].messages[0].content.contains("1. What changed?"));
        assert_eq!(calls[0].options.temperature, Some(0.3));
        assert_eq!(calls[0].options.max_tokens, Some(8100));
        assert!(calls[0].options.timeout.is_none());
    }

    #[tokio::test]
    async fn test_analyze_passage_decode_failure() {
        let backend = Arc::new(MockBackend::new(vec![Some("抱歉，我无法分析。")]));
        let agent = ReadingAgent::new(backend, "deepseek-chat");

        let err = agent.analyze_passage(&request()).await.unwrap_err();
        assert!(matches!(err, AppError::Decode(_)));
    }

    #[tokio::test]
    async fn test_analyze_passage_api_failure_is_not_retried() {
        let backend = Arc::new(MockBackend::new(vec![None, Some(ANALYSIS_JSON)]));
        let agent = ReadingAgent::new(backend.clone(), "deepseek-chat");

        let err = agent.analyze_passage(&request()).await.unwrap_err();
        assert!(matches!(err, AppError::Llm(_)));
        assert_eq!(backend.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_answer_question_uses_follow_up_parameters() {
        let backend = Arc::new(MockBackend::new(vec![Some("因为原文第一句提到了。")]));
        let agent = ReadingAgent::new(backend.clone(), "deepseek-chat").with_timeout(Some(30));

        let answer = agent
            .answer_question("为什么选A？", "文章：AI has evolved.")
            .await
            .unwrap();
        assert_eq!(answer, "因为原文第一句提到了。");

        let calls = backend.calls();
        assert_eq!(calls[0].options.temperature, Some(0.5));
        assert_eq!(calls[0].options.max_tokens, Some(2000));
        assert_eq!(calls[0].options.timeout, Some(30));
        assert!(calls[0].messages[0].content.contains("为什么选A？"));
    }
}
