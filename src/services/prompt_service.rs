//! Prompt 构建服务
//!
//! 负责构建阅读分析 prompt、追问 prompt 以及追问使用的上下文。

use crate::models::AnalysisResult;

/// 角色设定
const TEACHER_ROLE: &str = "你是一位经验丰富的雅思阅读老师。";

/// 分析要求和输出格式
///
/// `questions` 数组中每个对象的字段与 `QuestionAnalysis` 保持一致。
const ANALYSIS_INSTRUCTIONS: &str = r#"请逐题给出详细解析，每道题包含：
1. 原文定位句（精确到句子）
2. 同义替换分析（原文表达与题目表达的对应关系）
3. 解题思路与技巧
4. 错误选项分析

只输出 JSON，不要输出其他内容，结构如下：
{
    "questions": [
        {
            "question_number": 1,
            "correct_answer": "A",
            "location_sentence": "原文中的定位句",
            "synonym_replacement": {
                "原文词汇": "题目中的同义表达",
                "原文短语": "题目中的同义表达"
            },
            "explanation": "详细的解题思路",
            "wrong_options_analysis": "错误选项分析"
        }
    ]
}"#;

/// 追问回答要求
const FOLLOW_UP_INSTRUCTIONS: &str = "请给出详细、清晰的解答，帮助学生真正理解。";

/// Prompt 服务
pub struct PromptService;

impl PromptService {
    /// 创建新的 Prompt 服务
    pub fn new() -> Self {
        Self
    }

    /// 构建阅读分析 prompt
    ///
    /// 文章原样嵌入，题目和答案分别按输入顺序从 1 编号。
    /// 本地不做题目与答案的配对，由模型依据编号对应。
    pub fn build_analysis_prompt(
        &self,
        passage: &str,
        questions: &[String],
        answers: &[String],
    ) -> String {
        format!(
            "{role}请分析下面这篇雅思阅读文章及其题目。\n\n\
             文章：\n{passage}\n\n\
             题目：\n{questions}\n\n\
             标准答案：\n{answers}\n\n\
             {instructions}\n",
            role = TEACHER_ROLE,
            passage = passage,
            questions = Self::numbered_list(questions),
            answers = Self::numbered_list(answers),
            instructions = ANALYSIS_INSTRUCTIONS,
        )
    }

    /// 构建追问 prompt，期望模型返回自由文本
    pub fn build_follow_up_prompt(&self, user_question: &str, context: &str) -> String {
        format!(
            "{role}请基于之前的分析回答学生的问题。\n\n\
             相关上下文：\n{context}\n\n\
             学生问题：\n{question}\n\n\
             {instructions}\n",
            role = TEACHER_ROLE,
            context = context,
            question = user_question,
            instructions = FOLLOW_UP_INSTRUCTIONS,
        )
    }

    /// 构建追问上下文：文章 + 当前分析结果（格式化 JSON）
    pub fn build_follow_up_context(&self, passage: &str, analysis: &AnalysisResult) -> String {
        // 字段全是字符串/整数/映射，序列化不会失败
        let analysis_json = serde_json::to_string_pretty(analysis).unwrap_or_default();
        format!("文章：{}\n\n当前分析结果：\n{}", passage, analysis_json)
    }

    /// 渲染为从 1 开始的编号列表，每行一条
    fn numbered_list(items: &[String]) -> String {
        items
            .iter()
            .enumerate()
            .map(|(i, item)| format!("{}. {}", i + 1, item))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for PromptService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuestionAnalysis;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_analysis_prompt_contains_numbered_inputs() {
        let service = PromptService::new();
        let prompt = service.build_analysis_prompt(
            "AI has evolved.",
            &strings(&["What changed?"]),
            &strings(&["A"]),
        );

        assert!(prompt.contains("AI has evolved."));
        assert!(prompt.contains("1. What changed?"));
        assert!(prompt.contains("1. A"));
    }

    #[test]
    fn test_analysis_prompt_keeps_input_order() {
        let service = PromptService::new();
        let questions = strings(&["First question?", "Second question?", "Third question?"]);
        let answers = strings(&["C", "TRUE", "B"]);
        let prompt = service.build_analysis_prompt("passage", &questions, &answers);

        let q1 = prompt.find("1. First question?").unwrap();
        let q2 = prompt.find("2. Second question?").unwrap();
        let q3 = prompt.find("3. Third question?").unwrap();
        assert!(q1 < q2 && q2 < q3);

        let a1 = prompt.find("1. C").unwrap();
        let a2 = prompt.find("2. TRUE").unwrap();
        let a3 = prompt.find("3. B").unwrap();
        assert!(q3 < a1 && a1 < a2 && a2 < a3);
    }

    #[test]
    fn test_analysis_prompt_requests_schema() {
        let prompt = PromptService::new().build_analysis_prompt(
            "p",
            &strings(&["q"]),
            &strings(&["a"]),
        );
        for field in [
            "\"questions\"",
            "\"question_number\"",
            "\"correct_answer\"",
            "\"location_sentence\"",
            "\"synonym_replacement\"",
            "\"explanation\"",
            "\"wrong_options_analysis\"",
        ] {
            assert!(prompt.contains(field), "missing {}", field);
        }
    }

    #[test]
    fn test_mismatched_lengths_are_rendered_as_given() {
        let prompt = PromptService::new().build_analysis_prompt(
            "p",
            &strings(&["Q one", "Q two"]),
            &strings(&["A"]),
        );
        assert!(prompt.contains("2. Q two"));
        assert!(!prompt.contains("2. A"));
    }

    #[test]
    fn test_follow_up_prompt() {
        let prompt = PromptService::new()
            .build_follow_up_prompt("为什么第3题选A而不是B？", "文章：AI has evolved.");
        assert!(prompt.contains("为什么第3题选A而不是B？"));
        assert!(prompt.contains("文章：AI has evolved."));
        assert!(!prompt.contains("question_number"));
    }

    #[test]
    fn test_follow_up_context_embeds_analysis() {
        let analysis = AnalysisResult {
            questions: vec![QuestionAnalysis {
                question_number: 1,
                correct_answer: "A".to_string(),
                location_sentence: "AI has evolved.".to_string(),
                synonym_replacement: None,
                explanation: "定位到第一句".to_string(),
                wrong_options_analysis: None,
            }],
        };
        let context = PromptService::new().build_follow_up_context("AI has evolved.", &analysis);
        assert!(context.starts_with("文章：AI has evolved."));
        assert!(context.contains("\"question_number\": 1"));
        // 中文不转义
        assert!(context.contains("定位到第一句"));
    }
}
