//! 模型响应规范化
//!
//! 去掉模型可能包裹的 markdown 代码块标记，解码 JSON，并校验为 `AnalysisResult`。
//! 任何一处不合格都整体失败，不做部分解析。

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use crate::models::{AnalysisResult, QuestionAnalysis};

/// 开头的代码块标记，可带 json 语言标识，后面最多一个换行
static LEADING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^```(?i:json)?[ \t]*\r?\n?").expect("valid leading fence regex"));

/// 结尾的代码块标记，前面最多一个换行
static TRAILING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\r?\n?```$").expect("valid trailing fence regex"));

/// 规范化错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    /// 去掉代码块标记后仍不是合法 JSON
    #[error("模型返回的内容不是合法 JSON: {0}")]
    Decode(String),

    /// JSON 结构不符合要求
    #[error("模型返回的 JSON 结构不正确: {0}")]
    Schema(String),
}

/// 去掉首尾的代码块标记
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let start = LEADING_FENCE.find(trimmed).map_or(0, |m| m.end());
    let body = &trimmed[start..];
    let end = TRAILING_FENCE.find(body).map_or(body.len(), |m| m.start());
    body[..end].trim()
}

/// 把模型的原始回复解析为分析结果
pub fn normalize_analysis(raw: &str) -> Result<AnalysisResult, NormalizeError> {
    let body = strip_code_fences(raw);

    let value: Value =
        serde_json::from_str(body).map_err(|e| NormalizeError::Decode(e.to_string()))?;

    let object = value
        .as_object()
        .ok_or_else(|| NormalizeError::Schema("顶层必须是 JSON 对象".to_string()))?;

    let items = object
        .get("questions")
        .ok_or_else(|| NormalizeError::Schema("缺少 questions 字段".to_string()))?
        .as_array()
        .ok_or_else(|| NormalizeError::Schema("questions 必须是数组".to_string()))?;

    let questions = items
        .iter()
        .enumerate()
        .map(|(i, item)| parse_question(i, item))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(AnalysisResult { questions })
}

fn parse_question(index: usize, item: &Value) -> Result<QuestionAnalysis, NormalizeError> {
    let question: QuestionAnalysis = serde_json::from_value(item.clone())
        .map_err(|e| NormalizeError::Schema(format!("questions[{}]: {}", index, e)))?;

    if question.question_number == 0 {
        return Err(NormalizeError::Schema(format!(
            "questions[{}]: question_number 必须是正整数",
            index
        )));
    }

    Ok(question)
}
