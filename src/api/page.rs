//! 前端页面与示例数据

use axum::{response::Html, routing::get, Json, Router};
use std::sync::Arc;

use crate::models::SampleResponse;
use crate::services::sample_material;
use crate::state::AppState;

const INDEX_HTML: &str = include_str!("../../static/index.html");

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn sample() -> Json<SampleResponse> {
    Json(sample_material())
}

/// 创建页面路由
pub fn page_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/api/sample", get(sample))
}
