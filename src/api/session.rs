//! 会话、分析与追问端点

use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::error::{AppError, AppResult};
use crate::models::{
    ActionResponse, AnalysisRequest, AnalyzeRequest, AnalyzeResponse, AskRequest, AskResponse,
    SessionSnapshot, StartSessionRequest, StartSessionResponse,
};
use crate::services::SharedSession;
use crate::state::AppState;

fn find_session(state: &AppState, session_id: &str) -> AppResult<SharedSession> {
    state
        .sessions
        .get(session_id)
        .ok_or_else(|| AppError::NotFound(format!("会话 {} 不存在", session_id)))
}

/// 创建或复用会话
async fn start_session(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StartSessionRequest>,
) -> Json<StartSessionResponse> {
    let (session, created) = state.sessions.start_or_reuse(req.session_id.as_deref());
    let snapshot = session.lock().snapshot();
    Json(StartSessionResponse {
        created,
        session: snapshot,
    })
}

/// 获取会话快照
async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> AppResult<Json<SessionSnapshot>> {
    let session = find_session(&state, &session_id)?;
    let snapshot = session.lock().snapshot();
    Ok(Json(snapshot))
}

/// 分析阅读材料
async fn analyze(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(req): Json<AnalyzeRequest>,
) -> AppResult<Json<AnalyzeResponse>> {
    let session = find_session(&state, &session_id)?;

    let request = AnalysisRequest::from_raw_input(&req.passage, &req.questions, &req.answers);
    if !request.is_complete() {
        return Err(AppError::BadRequest("请填写文章、题目和答案".to_string()));
    }

    // 数量不一致时只提示，仍交给模型按编号配对
    let warning = request.count_mismatch();
    if let Some(msg) = &warning {
        warn!("Session {}: {}", session_id, msg);
    }

    let result = state.agent.analyze_passage(&request).await.map_err(|e| {
        error!("Analysis failed: session={}, error={}", session_id, e);
        e
    })?;

    if result.is_empty() {
        error!("Analysis returned no questions: session={}", session_id);
        return Err(AppError::Schema("模型未返回任何题目解析，请检查输入内容或API配置".to_string()));
    }

    session.lock().record_analysis(request.passage, result.clone());
    info!(
        "Analysis recorded: session={}, questions={}",
        session_id,
        result.questions.len()
    );

    Ok(Json(AnalyzeResponse {
        success: true,
        analysis: result,
        warning,
    }))
}

/// 针对当前分析结果追问
async fn ask(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(req): Json<AskRequest>,
) -> AppResult<Json<AskResponse>> {
    let session = find_session(&state, &session_id)?;

    let question = req.question.trim();
    if question.is_empty() {
        return Err(AppError::BadRequest("问题不能为空".to_string()));
    }

    let context = {
        let guard = session.lock();
        if !guard.has_analysis() {
            return Err(AppError::BadRequest("请先分析阅读材料，然后再提问".to_string()));
        }
        state
            .agent
            .prompts()
            .build_follow_up_context(guard.passage(), guard.analysis())
    };

    // 回答失败时把错误说明作为助手回复写入对话，方便用户看到
    let (success, answer) = match state.agent.answer_question(question, &context).await {
        Ok(answer) => (true, answer),
        Err(e) => {
            error!("Follow-up failed: session={}, error={}", session_id, e);
            (false, format!("抱歉，回答问题时出现错误: {}", e))
        }
    };

    let conversation = {
        let mut guard = session.lock();
        guard.append_exchange(question, answer.clone());
        guard.conversation().to_vec()
    };

    Ok(Json(AskResponse {
        success,
        answer,
        conversation,
    }))
}

/// 清空对话历史（保留分析结果）
async fn clear_history(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> AppResult<Json<ActionResponse>> {
    let session = find_session(&state, &session_id)?;
    session.lock().clear_conversation();
    info!("Conversation cleared: session={}", session_id);

    Ok(Json(ActionResponse {
        success: true,
        message: "对话历史已清空".to_string(),
    }))
}

/// 重置会话
async fn reset_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> AppResult<Json<ActionResponse>> {
    let session = find_session(&state, &session_id)?;
    session.lock().reset();
    info!("Session reset: session={}", session_id);

    Ok(Json(ActionResponse {
        success: true,
        message: "会话已重置".to_string(),
    }))
}

/// 创建会话路由
pub fn session_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/session", post(start_session))
        .route("/api/session/:id", get(get_session).delete(reset_session))
        .route("/api/session/:id/analyze", post(analyze))
        .route("/api/session/:id/ask", post(ask))
        .route("/api/session/:id/history", delete(clear_history))
}
