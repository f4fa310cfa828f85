//! API 路由模块

mod config;
mod health;
mod page;
mod session;

pub use config::config_routes;
pub use health::health_routes;
pub use page::page_routes;
pub use session::session_routes;

use axum::Router;

use crate::state::AppState;
use std::sync::Arc;

/// 创建所有 API 路由
pub fn create_api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(page_routes())
        .merge(health_routes())
        .merge(config_routes())
        .merge(session_routes())
        .with_state(state)
}
