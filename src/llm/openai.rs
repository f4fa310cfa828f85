//! OpenAI Chat Completions API 实现（非流式）

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

use super::types::{ChatCompletion, ChatMessage, ChatOptions, LlmError};

/// OpenAI 请求载荷
#[derive(Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

/// OpenAI 响应
#[derive(Deserialize, Debug)]
struct OpenAiResponse {
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
    usage: Option<OpenAiUsage>,
}

#[derive(Deserialize, Debug)]
struct OpenAiChoice {
    message: OpenAiMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct OpenAiMessage {
    content: Option<String>,
}

#[derive(Deserialize, Debug)]
struct OpenAiUsage {
    total_tokens: Option<u32>,
}

/// 调用 OpenAI 兼容的 chat/completions 接口并返回第一条回复
pub async fn complete_openai(
    client: &Client,
    api_key: &str,
    endpoint: &str,
    messages: &[ChatMessage],
    model: &str,
    options: &ChatOptions,
) -> Result<ChatCompletion, LlmError> {
    let payload = OpenAiRequest {
        model,
        messages,
        stream: false,
        temperature: options.temperature,
        max_tokens: options.max_tokens,
    };

    let mut request = client
        .post(endpoint)
        .bearer_auth(api_key)
        .header("Content-Type", "application/json");

    if let Some(secs) = options.timeout {
        request = request.timeout(Duration::from_secs(secs));
    }

    debug!("OpenAI API request: endpoint={}, model={}", endpoint, model);

    let response = request.json(&payload).send().await?;

    let status = response.status();
    if !status.is_success() {
        let status_code = status.as_u16();
        let error_text = response.text().await.unwrap_or_default();
        error!(
            "OpenAI API error: status={}, body={}",
            status_code,
            truncate_chars(&error_text, 500)
        );
        return Err(LlmError::ApiError {
            status: status_code,
            message: error_text,
        });
    }

    let body = response.text().await?;
    parse_completion(&body)
}

/// 解析 chat/completions 响应体
fn parse_completion(body: &str) -> Result<ChatCompletion, LlmError> {
    let parsed: OpenAiResponse = serde_json::from_str(body)?;
    let total_tokens = parsed.usage.and_then(|u| u.total_tokens);

    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or(LlmError::EmptyResponse)?;

    let content = choice
        .message
        .content
        .filter(|c| !c.trim().is_empty())
        .ok_or(LlmError::EmptyResponse)?;

    Ok(ChatCompletion {
        content,
        finish_reason: choice.finish_reason,
        total_tokens,
    })
}

/// 按字符截断，避免切在多字节字符中间
fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
