//! IELTS Reading Agent - Rust Backend
//!
//! 使用 axum 框架构建的雅思阅读解析服务：调用 OpenAI 兼容的大模型接口，
//! 生成逐题解析，并支持围绕解析结果的多轮追问。

use anyhow::Context;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod config;
mod error;
mod llm;
mod models;
mod services;
mod state;
mod utils;

use api::create_api_routes;
use config::AppConfig;
use state::create_shared_state;

/// 在 Windows 上设置控制台代码页为 UTF-8
#[cfg(windows)]
fn setup_console_encoding() {
    unsafe {
        extern "system" {
            fn SetConsoleOutputCP(code_page: u32) -> i32;
            fn SetConsoleCP(code_page: u32) -> i32;
        }
        SetConsoleOutputCP(65001);
        SetConsoleCP(65001);
    }
}

#[cfg(not(windows))]
fn setup_console_encoding() {}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_console_encoding();

    // .env 不存在时直接使用进程环境变量
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reading_agent=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting IELTS Reading Agent backend...");

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            error!("请复制 `.env.example` 为 `.env` 并配置您的API密钥");
            std::process::exit(1);
        }
    };

    info!("Using model: {}, API base: {}", config.model, config.base_url);
    let addr = config.bind_addr();

    let state = create_shared_state(config).context("failed to create LLM client")?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .merge(create_api_routes(Arc::clone(&state)))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on: http://{}", addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
