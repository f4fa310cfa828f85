//! 阅读分析数据模型

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 一次分析请求：文章、题目、标准答案
///
/// 题目与答案各自保持输入顺序，不要求数量一致，由模型按编号配对。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub passage: String,
    pub questions: Vec<String>,
    pub answers: Vec<String>,
}

impl AnalysisRequest {
    /// 从界面输入构造：文章原样保留，题目和答案按行拆分，去掉首尾空白和空行
    pub fn from_raw_input(passage: &str, questions: &str, answers: &str) -> Self {
        Self {
            passage: passage.to_string(),
            questions: split_lines(questions),
            answers: split_lines(answers),
        }
    }

    /// 三项输入是否都非空
    pub fn is_complete(&self) -> bool {
        !self.passage.trim().is_empty() && !self.questions.is_empty() && !self.answers.is_empty()
    }

    /// 题目数与答案数不一致时返回提示
    pub fn count_mismatch(&self) -> Option<String> {
        if self.questions.len() == self.answers.len() {
            None
        } else {
            Some(format!(
                "题目数量({})和答案数量({})不匹配，将按编号顺序配对",
                self.questions.len(),
                self.answers.len()
            ))
        }
    }
}

fn split_lines(input: &str) -> Vec<String> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// 单题解析
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionAnalysis {
    /// 题号，从 1 开始
    pub question_number: u32,
    /// 正确答案（选项标签）
    pub correct_answer: String,
    /// 原文定位句
    pub location_sentence: String,
    /// 同义替换：原文片段 → 题目中的表达
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synonym_replacement: Option<BTreeMap<String, String>>,
    /// 解题思路
    pub explanation: String,
    /// 错误选项分析
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrong_options_analysis: Option<String>,
}

/// 完整分析结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub questions: Vec<QuestionAnalysis>,
}

impl AnalysisResult {
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}
