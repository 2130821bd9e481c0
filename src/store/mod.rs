//! 题库层
//!
//! 两种策略共用同一组操作：
//! - `SeedBank`：固定种子题库，随机抽样
//! - `LlmBank`：每次请求调用 LLM 生成
//!
//! 请求处理器只面向 `QuestionBank`，不关心策略差异。

pub mod llm_bank;
pub mod seed_bank;

pub use llm_bank::LlmBank;
pub use seed_bank::SeedBank;

use tracing::debug;

use crate::models::{Question, QuestionDraft, QuestionType};

/// 题库
pub enum QuestionBank {
    /// 固定种子题库
    Seed(SeedBank),
    /// LLM 动态生成题库
    Llm(LlmBank),
}

impl QuestionBank {
    /// 随机取一道题
    pub async fn get_random_question(
        &self,
        types: Option<&[QuestionType]>,
        topic: Option<&str>,
    ) -> Option<Question> {
        match self {
            QuestionBank::Seed(bank) => {
                if topic.is_some() {
                    debug!("种子题库不支持主题筛选，忽略 topic 参数");
                }
                bank.get_random_question(types)
            }
            QuestionBank::Llm(bank) => bank.get_random_question(types, topic).await,
        }
    }

    /// 取 `num` 道题
    pub async fn get_random_questions(
        &self,
        num: usize,
        types: Option<&[QuestionType]>,
        topic: Option<&str>,
    ) -> Vec<Question> {
        match self {
            QuestionBank::Seed(bank) => {
                if topic.is_some() {
                    debug!("种子题库不支持主题筛选，忽略 topic 参数");
                }
                bank.get_random_questions(num, types)
            }
            QuestionBank::Llm(bank) => bank.get_random_questions(num, types, topic).await,
        }
    }

    /// 按 ID 查找题目
    pub fn get_question_by_id(&self, id: u64) -> Option<Question> {
        match self {
            QuestionBank::Seed(bank) => bank.get_question_by_id(id),
            QuestionBank::Llm(bank) => bank.get_question_by_id(id),
        }
    }

    /// 追加题目并分配新 ID
    pub fn add_question(&self, draft: QuestionDraft) -> Question {
        match self {
            QuestionBank::Seed(bank) => bank.add_question(draft),
            QuestionBank::Llm(bank) => bank.add_question(draft),
        }
    }
}
