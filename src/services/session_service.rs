//! 会话状态管理
//!
//! 每个会话保存最近一次分析结果、对应的文章和追问对话记录，只存在于内存中。
//! 会话按 ID 存放在 `SessionStore` 中，不同会话互不共享状态。

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::models::{AnalysisResult, ConversationTurn, Role, SessionSnapshot};

/// 单个会话的状态
#[derive(Debug)]
pub struct SessionState {
    id: String,
    passage: String,
    analysis: AnalysisResult,
    conversation: Vec<ConversationTurn>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SessionState {
    /// 创建空会话
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            passage: String::new(),
            analysis: AnalysisResult::default(),
            conversation: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn passage(&self) -> &str {
        &self.passage
    }

    pub fn analysis(&self) -> &AnalysisResult {
        &self.analysis
    }

    pub fn conversation(&self) -> &[ConversationTurn] {
        &self.conversation
    }

    /// 是否已有可供追问的分析结果
    pub fn has_analysis(&self) -> bool {
        !self.analysis.is_empty()
    }

    /// 记录新的分析结果，文章和结果一起替换，不影响对话记录
    pub fn record_analysis(&mut self, passage: impl Into<String>, result: AnalysisResult) {
        self.passage = passage.into();
        self.analysis = result;
        self.touch();
    }

    /// 追加一条对话
    pub fn append_turn(&mut self, role: Role, content: impl Into<String>) {
        self.conversation.push(ConversationTurn::new(role, content));
        self.touch();
    }

    /// 追加一轮问答（先用户后助手）
    pub fn append_exchange(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.append_turn(Role::User, question);
        self.append_turn(Role::Assistant, answer);
    }

    /// 清空对话记录，保留分析结果和文章
    pub fn clear_conversation(&mut self) {
        self.conversation.clear();
        self.touch();
    }

    /// 清空全部状态
    pub fn reset(&mut self) {
        self.passage.clear();
        self.analysis = AnalysisResult::default();
        self.conversation.clear();
        self.touch();
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id().to_string(),
            passage: self.passage.clone(),
            analysis: self.analysis.clone(),
            conversation: self.conversation.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// 共享的会话句柄
pub type SharedSession = Arc<Mutex<SessionState>>;

/// 会话注册表
///
/// 会话一经创建便常驻内存直到进程退出，重置只清空内容不移除条目。
/// 面向单用户本地使用，条目数随客户端创建的会话 ID 增长。
#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<String, SharedSession>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取或创建会话
    ///
    /// 已存在的会话原样返回，不会清空其对话记录。返回值中的 bool 表示是否新建。
    pub fn start_or_reuse(&self, session_id: Option<&str>) -> (SharedSession, bool) {
        let id = session_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let mut created = false;
        let session = {
            let entry = self.sessions.entry(id.clone()).or_insert_with(|| {
                created = true;
                Arc::new(Mutex::new(SessionState::new(id.clone())))
            });
            Arc::clone(entry.value())
        };

        if created {
            info!("Session created: {}", id);
        }
        (session, created)
    }

    /// 按 ID 查找会话
    pub fn get(&self, session_id: &str) -> Option<SharedSession> {
        self.sessions.get(session_id).map(|entry| Arc::clone(entry.value()))
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuestionAnalysis;

    fn result_with_answer(answer: &str) -> AnalysisResult {
        AnalysisResult {
            questions: vec![QuestionAnalysis {
                question_number: 1,
                correct_answer: answer.to_string(),
                location_sentence: "AI has evolved.".to_string(),
                synonym_replacement: None,
                explanation: "explanation".to_string(),
                wrong_options_analysis: None,
            }],
        }
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = SessionState::new("s1");
        assert_eq!(session.id(), "s1");
        assert!(session.passage().is_empty());
        assert!(!session.has_analysis());
        assert!(session.conversation().is_empty());
    }

    #[test]
    fn test_append_turns_in_order_and_clear_keeps_analysis() {
        let mut session = SessionState::new("s1");
        session.record_analysis("AI has evolved.", result_with_answer("A"));

        session.append_turn(Role::User, "为什么选A？");
        session.append_turn(Role::Assistant, "因为原文第一句。");
        assert_eq!(session.conversation().len(), 2);
        assert_eq!(session.conversation()[0].role, Role::User);
        assert_eq!(session.conversation()[1].role, Role::Assistant);

        session.clear_conversation();
        assert!(session.conversation().is_empty());
        assert_eq!(session.analysis(), &result_with_answer("A"));
        assert_eq!(session.passage(), "AI has evolved.");
    }

    #[test]
    fn test_record_analysis_replaces_not_merges() {
        let mut session = SessionState::new("s1");
        session.record_analysis("first passage", result_with_answer("A"));
        session.append_exchange("q", "a");
        session.record_analysis("second passage", result_with_answer("C"));

        assert_eq!(session.passage(), "second passage");
        assert_eq!(session.analysis().questions.len(), 1);
        assert_eq!(session.analysis().questions[0].correct_answer, "C");
        assert_eq!(session.conversation().len(), 2);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut session = SessionState::new("s1");
        session.record_analysis("p", result_with_answer("A"));
        session.append_exchange("q", "a");

        session.reset();
        assert!(session.passage().is_empty());
        assert!(!session.has_analysis());
        assert!(session.conversation().is_empty());
        assert_eq!(session.id(), "s1");
    }

    #[test]
    fn test_start_or_reuse_is_idempotent() {
        let store = SessionStore::new();
        let (session, created) = store.start_or_reuse(None);
        assert!(created);
        let id = session.lock().id().to_string();
        session.lock().append_exchange("q", "a");

        let (again, created) = store.start_or_reuse(Some(&id));
        assert!(!created);
        assert_eq!(again.lock().conversation().len(), 2);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_reset_keeps_session_registered() {
        let store = SessionStore::new();
        let (session, _) = store.start_or_reuse(Some("s1"));
        session.lock().record_analysis("p", result_with_answer("A"));
        session.lock().reset();

        assert_eq!(store.len(), 1);
        let (again, created) = store.start_or_reuse(Some("s1"));
        assert!(!created);
        assert!(Arc::ptr_eq(&session, &again));
        assert!(!again.lock().has_analysis());
    }

    #[test]
    fn test_sessions_are_isolated() {
        let store = SessionStore::new();
        let (a, _) = store.start_or_reuse(Some("a"));
        let (b, _) = store.start_or_reuse(Some("b"));
        a.lock().append_turn(Role::User, "only in a");

        assert_eq!(a.lock().conversation().len(), 1);
        assert!(b.lock().conversation().is_empty());
        assert!(store.get("c").is_none());
        assert!(store.get("a").is_some());
    }
}
