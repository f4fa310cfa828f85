//! 数据模型

mod analysis;
mod api;
mod session;

pub use analysis::{AnalysisRequest, AnalysisResult, QuestionAnalysis};
pub use api::*;
pub use session::{ConversationTurn, Role, SessionSnapshot};
