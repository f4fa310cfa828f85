//! 应用状态管理
//!
//! 定义在请求处理器之间共享的状态。

use std::sync::Arc;
use tracing::info;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::llm::{ChatBackend, LlmClient};
use crate::services::{ReadingAgent, SessionStore};
use crate::utils::RequestLogger;

/// 应用共享状态
pub struct AppState {
    /// 启动时加载的配置
    pub config: AppConfig,
    /// 阅读分析服务
    pub agent: ReadingAgent,
    /// 会话注册表
    pub sessions: SessionStore,
}

impl AppState {
    /// 使用给定的聊天后端创建状态
    pub fn new(config: AppConfig, backend: Arc<dyn ChatBackend>) -> Self {
        let agent = ReadingAgent::new(backend, config.model.clone())
            .with_timeout(config.request_timeout);
        Self {
            config,
            agent,
            sessions: SessionStore::new(),
        }
    }
}

/// 根据配置创建可共享的应用状态
pub fn create_shared_state(config: AppConfig) -> Result<Arc<AppState>, AppError> {
    let mut client = LlmClient::new(&config.api_key, &config.base_url)?;

    if let Some(dir) = &config.request_log_dir {
        let logger = RequestLogger::new(dir);
        info!("LLM request log: {}", logger.log_path().display());
        client = client.with_request_logger(Arc::new(logger));
    }

    Ok(Arc::new(AppState::new(config, Arc::new(client))))
}
