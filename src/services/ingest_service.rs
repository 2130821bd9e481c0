//! 文档入库服务 - 业务能力层
//!
//! 流程：提取文本 → LLM 结构化为选择题 → 逐条入库
//!
//! 任一环节失败都按"无法产出题目"收敛为输入错误，不让外部故障外溢。

use std::sync::Arc;

use tracing::{info, warn};

use crate::clients::TextExtractor;
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::Question;
use crate::services::generate_service::GenerateService;
use crate::store::QuestionBank;

/// 文档入库服务
pub struct IngestService {
    extractor: Arc<dyn TextExtractor>,
    generate: GenerateService,
    num_questions: usize,
}

impl IngestService {
    /// 创建新的文档入库服务
    pub fn new(
        extractor: Arc<dyn TextExtractor>,
        generate: GenerateService,
        config: &Config,
    ) -> Self {
        Self {
            extractor,
            generate,
            num_questions: config.ingest_num_questions,
        }
    }

    /// 把一份文档转成题目并入库
    ///
    /// 返回本次入库的题目（已分配 ID），顺序与生成顺序一致。
    pub async fn ingest(&self, bank: &QuestionBank, data: &[u8]) -> AppResult<Vec<Question>> {
        let text = self.extractor.extract_text(data).map_err(|e| {
            warn!("文档文本提取失败: {}", e);
            AppError::invalid_input("无法从 PDF 中提取文本")
        })?;

        info!("📄 文档文本提取完成，共 {} 字符", text.chars().count());

        let drafts = self
            .generate
            .questions_from_text(&text, self.num_questions)
            .await
            .map_err(|e| {
                warn!("题目结构化失败: {}", e);
                AppError::invalid_input("无法从文档内容生成题目")
            })?;

        if drafts.is_empty() {
            return Err(AppError::invalid_input("无法从文档内容生成题目"));
        }

        let stored: Vec<Question> = drafts
            .into_iter()
            .map(|draft| bank.add_question(draft))
            .collect();

        info!("✓ 文档入库完成，共 {} 题", stored.len());
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{ExtractError, GenerateError, TextGenerator};
    use crate::store::SeedBank;
    use futures::future::BoxFuture;

    struct FakeExtractor {
        text: Option<String>,
    }

    impl TextExtractor for FakeExtractor {
        fn extract_text(&self, _data: &[u8]) -> Result<String, ExtractError> {
            self.text.clone().ok_or(ExtractError::EmptyText)
        }
    }

    struct CannedGenerator {
        reply: String,
    }

    impl TextGenerator for CannedGenerator {
        fn is_configured(&self) -> bool {
            true
        }

        fn complete<'a>(
            &'a self,
            _system_prompt: &'a str,
            _user_prompt: &'a str,
        ) -> BoxFuture<'a, Result<String, GenerateError>> {
            Box::pin(async move { Ok(self.reply.clone()) })
        }
    }

    fn service(text: Option<&str>, reply: &str) -> IngestService {
        IngestService::new(
            Arc::new(FakeExtractor {
                text: text.map(|s| s.to_string()),
            }),
            GenerateService::new(Arc::new(CannedGenerator {
                reply: reply.to_string(),
            })),
            &Config::default(),
        )
    }

    const MCQ_PAYLOAD: &str = r#"[
        {"type": "multiple_choice", "question": "Q1",
         "options": ["a", "b", "c", "d"], "answer": "a"},
        {"type": "multiple_choice", "question": "Q2",
         "options": ["x", "y", "z", "w"], "answer": "y"}
    ]"#;

    #[tokio::test]
    async fn test_ingest_appends_questions_with_fresh_ids() {
        let bank = QuestionBank::Seed(SeedBank::builtin());
        let before = match &bank {
            QuestionBank::Seed(seed) => seed.len() as u64,
            _ => unreachable!(),
        };

        let stored = service(Some("document text"), MCQ_PAYLOAD)
            .ingest(&bank, b"%PDF-fake")
            .await
            .unwrap();

        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].id, before + 1);
        assert_eq!(stored[1].id, before + 2);
        // 入库后立即可按 ID 查到
        assert!(bank.get_question_by_id(stored[1].id).is_some());
    }

    #[tokio::test]
    async fn test_extraction_fault_is_invalid_input() {
        let bank = QuestionBank::Seed(SeedBank::builtin());
        let err = service(None, MCQ_PAYLOAD)
            .ingest(&bank, b"not a pdf")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_unparseable_structuring_is_invalid_input() {
        let bank = QuestionBank::Seed(SeedBank::builtin());
        let err = service(Some("document text"), "抱歉，无法生成")
            .ingest(&bank, b"%PDF-fake")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
