//! 服务层模块

mod prompt_service;
mod reading_agent;
mod response_normalizer;
mod sample;
mod session_service;

pub use reading_agent::ReadingAgent;
pub use response_normalizer::NormalizeError;
pub use sample::sample_material;
pub use session_service::{SessionStore, SharedSession};
