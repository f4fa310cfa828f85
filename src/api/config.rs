//! 配置查看与连接测试端点

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tracing::{error, info};

use crate::config::ConfigView;
use crate::error::AppResult;
use crate::models::TestConnectionResponse;
use crate::state::AppState;

/// 获取当前配置（密钥脱敏）
async fn get_config_handler(State(state): State<Arc<AppState>>) -> Json<ConfigView> {
    Json(ConfigView::from(&state.config))
}

/// 测试 LLM 连接
async fn test_connection_handler(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<TestConnectionResponse>> {
    let reply = state.agent.test_connection().await.map_err(|e| {
        error!("API test failed: {}", e);
        e
    })?;

    info!("API test succeeded: model={}", state.agent.model());

    Ok(Json(TestConnectionResponse {
        success: true,
        message: "API配置正确".to_string(),
        model: state.agent.model().to_string(),
        endpoint: state.agent.endpoint().to_string(),
        reply,
    }))
}

/// 创建配置路由
pub fn config_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/config", get(get_config_handler))
        .route("/api/config/test", post(test_connection_handler))
}
