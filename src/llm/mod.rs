//! LLM 模块
//!
//! 提供 OpenAI 兼容（DeepSeek、Moonshot 等）的聊天补全客户端。

mod client;
mod format;
#[cfg(test)]
pub mod mock;
mod openai;
mod types;

pub use client::{ChatBackend, LlmClient};
pub use types::*;
