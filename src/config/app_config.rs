//! 应用配置管理
//!
//! 配置来自环境变量，启动时由 `dotenvy` 先加载本地 `.env` 文件（不纳入版本管理）。

use serde::Serialize;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use crate::error::AppError;
use crate::utils::RequestLogger;

const ENV_API_KEY: &str = "OPENAI_API_KEY";
const ENV_API_BASE: &str = "OPENAI_API_BASE";
const ENV_MODEL: &str = "MODEL_NAME";
const ENV_HOST: &str = "APP_HOST";
const ENV_PORT: &str = "APP_PORT";
const ENV_TIMEOUT: &str = "LLM_TIMEOUT_SECS";
const ENV_REQUEST_LOG_DIR: &str = "LLM_REQUEST_LOG_DIR";

/// `.env.example` 中的占位值，视为未配置
const API_KEY_PLACEHOLDER: &str = "your_api_key_here";

/// 应用配置结构体
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// LLM API 密钥
    pub api_key: String,

    /// LLM API 基础 URL
    pub base_url: String,

    /// 模型名称
    pub model: String,

    /// 监听地址
    pub host: IpAddr,

    /// 监听端口
    pub port: u16,

    /// 单次 LLM 请求超时（秒），未设置则不限制
    pub request_timeout: Option<u64>,

    /// LLM 请求日志目录，未设置则不记录
    pub request_log_dir: Option<PathBuf>,
}

fn default_base_url() -> String {
    "https://api.deepseek.com/v1".to_string()
}

fn default_model() -> String {
    "deepseek-chat".to_string()
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

fn default_port() -> u16 {
    8501
}

impl AppConfig {
    /// 从进程环境变量加载配置
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 通过任意查找函数加载配置
    ///
    /// 空字符串与缺失同等对待。
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = get(ENV_API_KEY)
            .filter(|key| key != API_KEY_PLACEHOLDER)
            .ok_or_else(|| AppError::Config(format!("请设置{}环境变量", ENV_API_KEY)))?;

        let host = match get(ENV_HOST) {
            Some(raw) => raw
                .parse::<IpAddr>()
                .map_err(|_| AppError::Config(format!("{} 不是合法的 IP 地址: {}", ENV_HOST, raw)))?,
            None => default_host(),
        };

        let port = match get(ENV_PORT) {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| AppError::Config(format!("{} 不是合法的端口: {}", ENV_PORT, raw)))?,
            None => default_port(),
        };

        let request_timeout = match get(ENV_TIMEOUT) {
            Some(raw) => Some(
                raw.parse::<u64>()
                    .map_err(|_| AppError::Config(format!("{} 必须是正整数: {}", ENV_TIMEOUT, raw)))?,
            ),
            None => None,
        };

        Ok(Self {
            api_key,
            base_url: get(ENV_API_BASE).unwrap_or_else(default_base_url),
            model: get(ENV_MODEL).unwrap_or_else(default_model),
            host,
            port,
            request_timeout,
            request_log_dir: get(ENV_REQUEST_LOG_DIR).map(PathBuf::from),
        })
    }

    /// 服务监听地址
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// 配置响应（隐藏 api_key 的实际值）
#[derive(Debug, Serialize)]
pub struct ConfigView {
    /// 是否已设置 API 密钥
    pub api_key_set: bool,
    /// 脱敏后的密钥
    pub api_key_masked: String,
    /// API 基础 URL
    pub base_url: String,
    /// 模型名称
    pub model: String,
}

impl From<&AppConfig> for ConfigView {
    fn from(config: &AppConfig) -> Self {
        Self {
            api_key_set: !config.api_key.is_empty(),
            api_key_masked: RequestLogger::mask_api_key(&config.api_key),
            base_url: config.base_url.clone(),
            model: config.model.clone(),
        }
    }
}
