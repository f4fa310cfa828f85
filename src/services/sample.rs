//! 演示用的阅读材料，前端“加载示例”按钮使用

use crate::models::SampleResponse;

const SAMPLE_PASSAGE: &str = "The concept of artificial intelligence (AI) has evolved significantly since its inception in the 1950s. Early AI systems were rule-based and limited to specific domains, but modern AI, particularly machine learning, has revolutionized numerous industries. From healthcare diagnostics to autonomous vehicles, AI applications are becoming increasingly sophisticated and widespread.

However, this rapid advancement has sparked debates about the ethical implications of AI. Critics argue that AI systems may perpetuate biases present in their training data, leading to discriminatory outcomes in areas such as hiring, lending, and criminal justice. Additionally, there are concerns about job displacement as AI automation replaces human workers in various sectors.

Despite these challenges, many experts believe that AI, when properly regulated and developed, can bring tremendous benefits to society. Dr. Sarah Chen, a leading AI researcher at Stanford University, emphasizes that 'the key lies in developing AI systems that augment human capabilities rather than replace them entirely.' She advocates for transparent AI development processes and robust ethical frameworks to ensure that AI serves the greater good.";

const SAMPLE_QUESTIONS: [&str; 5] = [
    "What is the main difference between early AI systems and modern AI?",
    "According to the passage, what are two major concerns about AI development?",
    "What does Dr. Sarah Chen suggest as the key to beneficial AI development?",
    "Which of the following is NOT mentioned as an application of modern AI?",
    "What is the author's overall attitude toward AI development?",
];

const SAMPLE_ANSWERS: [&str; 5] = ["B", "C", "A", "D", "C"];

pub fn sample_material() -> SampleResponse {
    SampleResponse {
        passage: SAMPLE_PASSAGE,
        questions: SAMPLE_QUESTIONS.to_vec(),
        answers: SAMPLE_ANSWERS.to_vec(),
    }
}
