//! REST API 请求/响应模型

use serde::{Deserialize, Serialize};

use super::analysis::AnalysisResult;
use super::session::{ConversationTurn, SessionSnapshot};

/// 创建或复用会话请求
#[derive(Debug, Default, Deserialize)]
pub struct StartSessionRequest {
    #[serde(default)]
    pub session_id: Option<String>,
}

/// 创建或复用会话响应
#[derive(Debug, Serialize)]
pub struct StartSessionResponse {
    /// 是否新建
    pub created: bool,
    pub session: SessionSnapshot,
}

/// 分析请求：题目和答案为每行一条的原始文本
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub passage: String,
    pub questions: String,
    pub answers: String,
}

/// 分析响应
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub analysis: AnalysisResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// 追问请求
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

/// 追问响应
#[derive(Debug, Serialize)]
pub struct AskResponse {
    /// 模型是否正常回答
    pub success: bool,
    pub answer: String,
    pub conversation: Vec<ConversationTurn>,
}

/// 通用操作响应
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
}

/// 连接测试响应
#[derive(Debug, Serialize)]
pub struct TestConnectionResponse {
    pub success: bool,
    pub message: String,
    pub model: String,
    pub endpoint: String,
    pub reply: String,
}

/// 示例数据
#[derive(Debug, Serialize)]
pub struct SampleResponse {
    pub passage: &'static str,
    pub questions: Vec<&'static str>,
    pub answers: Vec<&'static str>,
}
