//! LLM 请求日志记录器
//!
//! 把每次 LLM 调用追加到 JSONL 文件，便于排查模型返回格式问题。

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::warn;
use uuid::Uuid;

use crate::llm::ChatMessage;

const LOG_FILE_NAME: &str = "llm_requests.jsonl";
const DEFAULT_MAX_ENTRIES: usize = 1000;

/// 请求日志条目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
    pub endpoint: String,
    /// API 密钥（脱敏）
    pub api_key_masked: String,
    pub model: String,
    pub messages_preview: Vec<MessagePreview>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// pending / success / error
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_preview: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

/// 消息预览
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagePreview {
    pub role: String,
    pub content_preview: String,
}

/// 请求日志记录器
pub struct RequestLogger {
    log_path: PathBuf,
    max_entries: usize,
    file: Mutex<Option<File>>,
}

impl RequestLogger {
    /// 在指定目录下创建日志记录器
    pub fn new(log_dir: &Path) -> Self {
        if let Err(e) = fs::create_dir_all(log_dir) {
            warn!("Failed to create request log dir {}: {}", log_dir.display(), e);
        }

        Self {
            log_path: log_dir.join(LOG_FILE_NAME),
            max_entries: DEFAULT_MAX_ENTRIES,
            file: Mutex::new(None),
        }
    }

    /// 设置保留的最大条目数
    #[cfg(test)]
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// 生成请求 ID
    pub fn generate_request_id() -> String {
        Uuid::new_v4().simple().to_string()[..8].to_string()
    }

    /// API 密钥脱敏
    pub fn mask_api_key(api_key: &str) -> String {
        let chars: Vec<char> = api_key.chars().collect();
        if chars.len() <= 8 {
            "*".repeat(chars.len())
        } else {
            let head: String = chars[..4].iter().collect();
            let tail: String = chars[chars.len() - 4..].iter().collect();
            format!("{}...{}", head, tail)
        }
    }

    fn truncate(s: &str, max_chars: usize) -> String {
        match s.char_indices().nth(max_chars) {
            Some((idx, _)) => format!("{}...", &s[..idx]),
            None => s.to_string(),
        }
    }

    /// 记录请求开始（仅构造条目，结束时才写入）
    pub fn log_request(
        &self,
        endpoint: &str,
        api_key: &str,
        model: &str,
        messages: &[ChatMessage],
        temperature: Option<f64>,
        max_tokens: Option<u32>,
    ) -> LogEntry {
        LogEntry {
            request_id: Self::generate_request_id(),
            timestamp: Utc::now(),
            endpoint: endpoint.to_string(),
            api_key_masked: Self::mask_api_key(api_key),
            model: model.to_string(),
            messages_preview: messages
                .iter()
                .take(3)
                .map(|m| MessagePreview {
                    role: m.role.clone(),
                    content_preview: Self::truncate(&m.content, 200),
                })
                .collect(),
            temperature,
            max_tokens,
            status: "pending".to_string(),
            duration_ms: None,
            response_length: None,
            response_preview: None,
            error_type: None,
            error_message: None,
            status_code: None,
        }
    }

    /// 记录成功
    pub fn log_success(&self, mut entry: LogEntry, start_time: Instant, response: &str) {
        entry.status = "success".to_string();
        entry.duration_ms = Some(start_time.elapsed().as_millis() as u64);
        entry.response_length = Some(response.chars().count());
        entry.response_preview = Some(Self::truncate(response, 300));
        self.write_entry(&entry);
    }

    /// 记录错误
    pub fn log_error(
        &self,
        mut entry: LogEntry,
        start_time: Instant,
        error_type: &str,
        error_message: &str,
        status_code: Option<u16>,
    ) {
        entry.status = "error".to_string();
        entry.duration_ms = Some(start_time.elapsed().as_millis() as u64);
        entry.error_type = Some(error_type.to_string());
        entry.error_message = Some(Self::truncate(error_message, 500));
        entry.status_code = status_code;
        self.write_entry(&entry);
    }

    fn write_entry(&self, entry: &LogEntry) {
        let mut file_guard = self.file.lock();

        // 懒加载文件
        if file_guard.is_none() {
            match OpenOptions::new().create(true).append(true).open(&self.log_path) {
                Ok(f) => *file_guard = Some(f),
                Err(e) => {
                    warn!("Failed to open request log {}: {}", self.log_path.display(), e);
                    return;
                }
            }
        }

        if let Some(file) = file_guard.as_mut() {
            if let Ok(json) = serde_json::to_string(entry) {
                let _ = writeln!(file, "{}", json);
                let _ = file.flush();
            }
        }

        self.cleanup_if_needed(&mut file_guard);
    }

    /// 超过上限时只保留最新的条目
    fn cleanup_if_needed(&self, file_guard: &mut Option<File>) {
        let Ok(file) = File::open(&self.log_path) else {
            return;
        };
        let lines: Vec<String> = BufReader::new(file).lines().map_while(Result::ok).collect();

        if lines.len() <= self.max_entries {
            return;
        }

        // 重写后旧句柄的追加位置失效，关掉让下次重新打开
        *file_guard = None;
        if let Ok(mut file) = File::create(&self.log_path) {
            for line in &lines[lines.len() - self.max_entries..] {
                let _ = writeln!(file, "{}", line);
            }
        }
    }
}
