//! 测试用的聊天后端

use async_trait::async_trait;
use parking_lot::Mutex;

use super::client::ChatBackend;
use super::types::{ChatCompletion, ChatMessage, ChatOptions, LlmError};

/// 一次被记录的调用
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub messages: Vec<ChatMessage>,
    pub model: String,
    pub options: ChatOptions,
}

/// 按顺序返回预设回复；`None` 表示模拟一次 API 失败
pub struct MockBackend {
    replies: Mutex<Vec<Option<String>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockBackend {
    pub fn new(replies: Vec<Option<&str>>) -> Self {
        let mut replies: Vec<Option<String>> =
            replies.into_iter().map(|r| r.map(str::to_string)).collect();
        replies.reverse();
        Self {
            replies: Mutex::new(replies),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl ChatBackend for MockBackend {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        model: &str,
        options: ChatOptions,
    ) -> Result<ChatCompletion, LlmError> {
        self.calls.lock().push(RecordedCall {
            messages,
            model: model.to_string(),
            options,
        });

        match self.replies.lock().pop().flatten() {
            Some(content) => Ok(ChatCompletion {
                content,
                finish_reason: Some("stop".to_string()),
                total_tokens: None,
            }),
            None => Err(LlmError::ApiError {
                status: 401,
                message: "invalid api key".to_string(),
            }),
        }
    }

    fn endpoint(&self) -> &str {
        "http://mock/v1/chat/completions"
    }
}
