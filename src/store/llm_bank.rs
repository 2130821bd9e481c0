//! 生成式题库 - 每次请求调用 LLM 出题
//!
//! 产出的题目追加到进程级日志（只增不删，不参与后续抽样），
//! `get_question_by_id` 只在这份日志里查找。ID 分配与追加在同一把
//! 互斥锁内完成，并发请求下不会重复或丢失。

use std::sync::Mutex;

use tracing::{debug, warn};

use crate::models::{Question, QuestionDraft, QuestionType};
use crate::services::generate_service::GenerateService;

/// 生成式题库
pub struct LlmBank {
    generate: GenerateService,
    log: Mutex<GeneratedLog>,
}

struct GeneratedLog {
    questions: Vec<Question>,
    next_id: u64,
}

impl LlmBank {
    /// 创建新的生成式题库
    pub fn new(generate: GenerateService) -> Self {
        Self {
            generate,
            log: Mutex::new(GeneratedLog {
                questions: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// 生成一道题
    ///
    /// 生成故障降级为"没有题目"，不向调用方抛错。
    pub async fn get_random_question(
        &self,
        types: Option<&[QuestionType]>,
        topic: Option<&str>,
    ) -> Option<Question> {
        match self.generate.generate_questions(1, types, topic).await {
            Ok(drafts) => drafts.into_iter().next().map(|draft| self.record(draft)),
            Err(e) => {
                warn!("题目生成失败: {}", e);
                None
            }
        }
    }

    /// 一次调用生成 `num` 道题
    ///
    /// 每次都是全新生成，不复用历史产出；故障降级为空列表。
    pub async fn get_random_questions(
        &self,
        num: usize,
        types: Option<&[QuestionType]>,
        topic: Option<&str>,
    ) -> Vec<Question> {
        match self.generate.generate_questions(num, types, topic).await {
            Ok(drafts) => {
                debug!("本次生成 {} 道题目", drafts.len());
                drafts.into_iter().map(|draft| self.record(draft)).collect()
            }
            Err(e) => {
                warn!("题目生成失败: {}", e);
                Vec::new()
            }
        }
    }

    /// 在已生成的题目日志中按 ID 查找
    pub fn get_question_by_id(&self, id: u64) -> Option<Question> {
        let log = self.log.lock().unwrap();
        log.questions.iter().find(|q| q.id == id).cloned()
    }

    /// 追加外部产出的题目（上传文档结构化的结果）
    pub fn add_question(&self, draft: QuestionDraft) -> Question {
        self.record(draft)
    }

    /// 分配 ID 并写入日志
    fn record(&self, draft: QuestionDraft) -> Question {
        let mut log = self.log.lock().unwrap();
        let id = log.next_id;
        log.next_id += 1;
        let question = draft.into_question(id);
        log.questions.push(question.clone());
        question
    }
}
