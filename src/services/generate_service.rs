//! 出题服务 - 业务能力层
//!
//! 只负责"让 LLM 产出一批结构化题目"能力，不关心题目如何入库
//!
//! LLM 的回复按 JSON 数组解析；整体不可解析视为一次生成故障，
//! 单条记录不合法（答案不在选项中、排列不成立等）只跳过该条。

use std::sync::Arc;

use regex::Regex;
use tracing::{debug, warn};

use crate::clients::{GenerateError, TextGenerator};
use crate::models::{QuestionDraft, QuestionType};

const SYSTEM_PROMPT: &str = "你是一名出题助手，只输出 JSON 数组，不输出任何多余文字。";

/// 上传文档送入提示词的最大字符数
const MAX_SOURCE_TEXT_CHARS: usize = 8000;

/// 出题服务
#[derive(Clone)]
pub struct GenerateService {
    generator: Arc<dyn TextGenerator>,
}

impl GenerateService {
    /// 创建新的出题服务
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// 按题型与主题生成一批题目
    ///
    /// 一次调用产出 `num` 道题；结果数量以 LLM 实际产出为准。
    pub async fn generate_questions(
        &self,
        num: usize,
        types: Option<&[QuestionType]>,
        topic: Option<&str>,
    ) -> Result<Vec<QuestionDraft>, GenerateError> {
        let prompt = build_generation_prompt(num, types, topic);
        let response = self.generator.complete(SYSTEM_PROMPT, &prompt).await?;
        parse_drafts(&response)
    }

    /// 从一段文档文本结构化出选择题
    pub async fn questions_from_text(
        &self,
        text: &str,
        num: usize,
    ) -> Result<Vec<QuestionDraft>, GenerateError> {
        let source: String = text.chars().take(MAX_SOURCE_TEXT_CHARS).collect();
        let prompt = build_ingest_prompt(&source, num);
        let response = self.generator.complete(SYSTEM_PROMPT, &prompt).await?;

        let drafts = parse_drafts(&response)?;
        // 上传文档只允许产出选择题，其余类型一律丢弃
        Ok(drafts
            .into_iter()
            .filter(|draft| {
                let keep = draft.content.question_type() == Some(QuestionType::MultipleChoice);
                if !keep {
                    warn!("丢弃非选择题记录: {}", draft.stem);
                }
                keep
            })
            .collect())
    }
}

/// 构建按题型/主题出题的提示词
fn build_generation_prompt(
    num: usize,
    types: Option<&[QuestionType]>,
    topic: Option<&str>,
) -> String {
    let allowed: Vec<QuestionType> = match types {
        Some(list) if !list.is_empty() => list.to_vec(),
        _ => QuestionType::ALL.to_vec(),
    };
    let allowed_text = allowed
        .iter()
        .map(|qt| format!("\"{}\"（{}）", qt.as_str(), qt.name()))
        .collect::<Vec<_>>()
        .join("、");

    let topic_text = match topic {
        Some(t) if !t.trim().is_empty() => format!("题目主题：{}\n", t.trim()),
        _ => String::new(),
    };

    format!(
        r#"请生成 {} 道题目，输出一个 JSON 数组，不要输出数组以外的任何内容。
{}允许的题型（type 字段取值）：{}

每个元素的结构：
- "type": 题型标识
- "question": 题干
- "options": 选项数组（仅 multiple_choice 和 sentence_rearrangement 需要）
- "answer": 正确答案；fill_blank 和 multiple_choice 为字符串，sentence_rearrangement 为字符串数组

约束：
1. multiple_choice 的 answer 必须与某个选项逐字一致
2. sentence_rearrangement 的 answer 必须恰好是 options 的一个排列
3. fill_blank 不要带 options 字段"#,
        num, topic_text, allowed_text
    )
}

/// 构建从文档文本结构化选择题的提示词
fn build_ingest_prompt(source: &str, num: usize) -> String {
    format!(
        r#"根据下面的文档内容生成 {} 道选择题，输出一个 JSON 数组，不要输出数组以外的任何内容。

每个元素的结构：
- "type": 固定为 "multiple_choice"
- "question": 题干
- "options": 4 个选项
- "answer": 正确答案，必须与某个选项逐字一致

文档内容：
{}"#,
        num, source
    )
}

/// 把 LLM 回复解析为题目草稿列表
///
/// 容忍代码块围栏与少量寒暄文字；数组整体不可解析返回 BadPayload。
fn parse_drafts(response: &str) -> Result<Vec<QuestionDraft>, GenerateError> {
    let payload = extract_json_payload(response)
        .ok_or_else(|| GenerateError::BadPayload("回复中没有 JSON 数组".to_string()))?;

    let drafts: Vec<QuestionDraft> = serde_json::from_str(&payload)
        .map_err(|e| GenerateError::BadPayload(e.to_string()))?;

    let total = drafts.len();
    let valid: Vec<QuestionDraft> = drafts
        .into_iter()
        .filter(|draft| match draft.content.validate() {
            Ok(()) => true,
            Err(reason) => {
                warn!("丢弃不合法的生成记录 ({}): {}", reason, draft.stem);
                false
            }
        })
        .collect();

    debug!("生成记录解析完成: {}/{} 条有效", valid.len(), total);
    Ok(valid)
}

/// 从回复中取出 JSON 数组文本
///
/// 优先取 ``` 围栏内的内容，退而求其次截取第一个 '[' 到最后一个 ']'。
fn extract_json_payload(response: &str) -> Option<String> {
    if let Ok(fence) = Regex::new(r"```(?:json)?\s*([\s\S]*?)```") {
        if let Some(captures) = fence.captures(response) {
            if let Some(inner) = captures.get(1) {
                let inner = inner.as_str().trim();
                if !inner.is_empty() {
                    return Some(inner.to_string());
                }
            }
        }
    }

    let start = response.find('[')?;
    let end = response.rfind(']')?;
    if end <= start {
        return None;
    }
    Some(response[start..=end].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::BoxFuture;

    struct CannedGenerator {
        reply: Result<String, String>,
    }

    impl CannedGenerator {
        fn new(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
            }
        }
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
            Box::pin(async move {
                match &self.reply {
                    Ok(text) => Ok(text.clone()),
                    Err(message) => Err(GenerateError::Api(message.clone())),
                }
            })
        }
    }

    const VALID_PAYLOAD: &str = r#"[
        {"type": "multiple_choice", "question": "Which ocean is the largest?",
         "options": ["Atlantic", "Pacific", "Indian", "Arctic"], "answer": "Pacific"},
        {"type": "fill_blank", "question": "Water boils at ___ degrees Celsius.",
         "answer": "100"}
    ]"#;

    #[test]
    fn test_generate_questions_parses_plain_array() {
        let service = GenerateService::new(Arc::new(CannedGenerator::new(VALID_PAYLOAD)));
        let drafts =
            tokio_test::block_on(service.generate_questions(2, None, None)).unwrap();
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].stem, "Which ocean is the largest?");
    }

    #[tokio::test]
    async fn test_parse_tolerates_fenced_reply() {
        let fenced = format!("好的，题目如下：\n```json\n{}\n```", VALID_PAYLOAD);
        let service = GenerateService::new(Arc::new(CannedGenerator::new(&fenced)));
        let drafts = service.generate_questions(2, None, None).await.unwrap();
        assert_eq!(drafts.len(), 2);
    }

    #[tokio::test]
    async fn test_malformed_reply_is_bad_payload() {
        let service = GenerateService::new(Arc::new(CannedGenerator::new("抱歉，我无法生成题目")));
        let err = service.generate_questions(2, None, None).await.unwrap_err();
        assert!(matches!(err, GenerateError::BadPayload(_)));
    }

    #[tokio::test]
    async fn test_invalid_records_are_skipped_individually() {
        // 第二条的答案不是选项的排列，应被丢弃，第一条保留
        let payload = r#"[
            {"type": "fill_blank", "question": "2 + 2 = ___", "answer": "4"},
            {"type": "sentence_rearrangement", "question": "Arrange.",
             "options": ["I", "am"], "answer": ["I", "was"]}
        ]"#;
        let service = GenerateService::new(Arc::new(CannedGenerator::new(payload)));
        let drafts = service.generate_questions(2, None, None).await.unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].stem, "2 + 2 = ___");
    }

    #[tokio::test]
    async fn test_api_fault_propagates_as_error() {
        let service = GenerateService::new(Arc::new(CannedGenerator::failing("boom")));
        let err = service.generate_questions(1, None, None).await.unwrap_err();
        assert!(matches!(err, GenerateError::Api(_)));
    }

    #[tokio::test]
    async fn test_questions_from_text_keeps_only_multiple_choice() {
        let payload = r#"[
            {"type": "multiple_choice", "question": "Q1",
             "options": ["a", "b"], "answer": "a"},
            {"type": "fill_blank", "question": "Q2", "answer": "x"}
        ]"#;
        let service = GenerateService::new(Arc::new(CannedGenerator::new(payload)));
        let drafts = service.questions_from_text("some document", 2).await.unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(
            drafts[0].content.question_type(),
            Some(QuestionType::MultipleChoice)
        );
    }

    #[test]
    fn test_generation_prompt_lists_requested_types_and_topic() {
        let prompt = build_generation_prompt(
            3,
            Some(&[QuestionType::FillBlank]),
            Some("越南地理"),
        );
        assert!(prompt.contains("允许的题型（type 字段取值）：\"fill_blank\"（填空题）"));
        assert!(prompt.contains("题目主题：越南地理"));
    }
}
