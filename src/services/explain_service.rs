//! 解析生成服务 - 业务能力层
//!
//! 只负责"为一道题生成解析"能力，不关心判题流程
//!
//! 任何生成故障都就地降级为"无解析"，绝不向调用方抛错。

use std::sync::Arc;

use tracing::{debug, warn};

use crate::clients::TextGenerator;
use crate::models::{Question, QuestionContent};

const SYSTEM_PROMPT: &str = "你是一名教育助手，负责用清晰、详细的中文解释题目，帮助学生理解答案背后的知识点。";

/// 解析生成服务
pub struct ExplainService {
    generator: Arc<dyn TextGenerator>,
}

impl ExplainService {
    /// 创建新的解析生成服务
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// 为题目生成解析文本
    ///
    /// 凭证未配置时直接跳过，不发起调用；调用失败只记日志并返回 None。
    pub async fn generate_explanation(&self, question: &Question) -> Option<String> {
        if !self.generator.is_configured() {
            debug!("LLM API key 未配置，跳过解析生成");
            return None;
        }

        let prompt = build_prompt(question);

        match self.generator.complete(SYSTEM_PROMPT, &prompt).await {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("解析生成失败 (题目 {}): {}", question.id, e);
                None
            }
        }
    }
}

/// 按题型构建解析提示词
fn build_prompt(question: &Question) -> String {
    match &question.content {
        QuestionContent::FillBlank { answer } => format!(
            "请为下面的填空题写一段详细解析：\n\n题目：{}\n正确答案：{}\n\n解释为什么这个答案是正确的，并补充相关知识点。",
            question.stem, answer
        ),
        QuestionContent::MultipleChoice { options, answer } => {
            let options_text = options
                .iter()
                .map(|opt| format!("- {}", opt))
                .collect::<Vec<_>>()
                .join("\n");
            format!(
                "请为下面的选择题写一段详细解析：\n\n题目：{}\n选项：\n{}\n\n正确答案：{}\n\n解释为什么这个答案是正确的，以及其他选项为什么不对。",
                question.stem, options_text, answer
            )
        }
        QuestionContent::SentenceRearrangement { answer, .. } => format!(
            "请为下面的排序题写一段详细解析：\n\n题目：{}\n正确答案：{}\n\n解释为什么这是正确的顺序，并补充相关的句子结构知识。",
            question.stem,
            answer.join(" ")
        ),
        QuestionContent::Unsupported => format!(
            "请为下面的题目写一段详细解析：\n\n题目：{}\n\n解释这道题考察的知识点。",
            question.stem
        ),
    }
}
