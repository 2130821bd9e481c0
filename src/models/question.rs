use serde::{Deserialize, Serialize};

use crate::models::question_type::QuestionType;

/// 题目
///
/// `content` 按题型约束答案与选项的形状，`type`/`options`/`answer`
/// 在序列化时平铺到顶层，与前端约定的 JSON 结构保持一致。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// 题目 ID，由题库分配，进程内唯一且不复用
    pub id: u64,
    /// 题干
    #[serde(rename = "question")]
    pub stem: String,
    #[serde(flatten)]
    pub content: QuestionContent,
    /// 解析文本（延迟生成，创建时可为空）
    pub explanation: Option<String>,
}

/// 题目内容
///
/// 题型标签决定答案的形状：选择题与排序题必须带选项，
/// 排序题的答案是选项的一个排列。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionContent {
    /// 填空题：单个文本答案
    FillBlank { answer: String },
    /// 选择题：答案必须与某个选项逐字一致
    MultipleChoice {
        options: Vec<String>,
        answer: String,
    },
    /// 排序题：答案是选项的有序排列
    SentenceRearrangement {
        options: Vec<String>,
        answer: Vec<String>,
    },
    /// 未识别的题型标签，判题时一律判错
    #[serde(other)]
    Unsupported,
}

impl QuestionContent {
    /// 获取题型，未识别标签返回 None
    pub fn question_type(&self) -> Option<QuestionType> {
        match self {
            QuestionContent::FillBlank { .. } => Some(QuestionType::FillBlank),
            QuestionContent::MultipleChoice { .. } => Some(QuestionType::MultipleChoice),
            QuestionContent::SentenceRearrangement { .. } => {
                Some(QuestionType::SentenceRearrangement)
            }
            QuestionContent::Unsupported => None,
        }
    }

    /// 获取选项列表（填空题没有选项）
    pub fn options(&self) -> Option<&[String]> {
        match self {
            QuestionContent::MultipleChoice { options, .. }
            | QuestionContent::SentenceRearrangement { options, .. } => Some(options),
            _ => None,
        }
    }

    /// 获取标准答案
    pub fn answer(&self) -> AnswerValue {
        match self {
            QuestionContent::FillBlank { answer } => AnswerValue::Text(answer.clone()),
            QuestionContent::MultipleChoice { answer, .. } => AnswerValue::Text(answer.clone()),
            QuestionContent::SentenceRearrangement { answer, .. } => {
                AnswerValue::Sequence(answer.clone())
            }
            QuestionContent::Unsupported => AnswerValue::Text(String::new()),
        }
    }

    /// 校验题目内容的结构约束
    ///
    /// 外部生成的题目（LLM 输出、种子文件）入库前必须通过校验。
    pub fn validate(&self) -> Result<(), String> {
        match self {
            QuestionContent::FillBlank { answer } => {
                if answer.trim().is_empty() {
                    return Err("填空题答案不能为空".to_string());
                }
                Ok(())
            }
            QuestionContent::MultipleChoice { options, answer } => {
                if options.is_empty() {
                    return Err("选择题必须提供选项".to_string());
                }
                if !options.contains(answer) {
                    return Err(format!("选择题答案 '{}' 不在选项中", answer));
                }
                Ok(())
            }
            QuestionContent::SentenceRearrangement { options, answer } => {
                if options.is_empty() {
                    return Err("排序题必须提供选项".to_string());
                }
                let mut expected = options.clone();
                let mut actual = answer.clone();
                expected.sort();
                actual.sort();
                if expected != actual {
                    return Err("排序题答案必须是选项的一个排列".to_string());
                }
                Ok(())
            }
            QuestionContent::Unsupported => Err("不支持的题型".to_string()),
        }
    }
}

/// 待入库的题目（尚未分配 ID）
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionDraft {
    #[serde(rename = "question")]
    pub stem: String,
    #[serde(flatten)]
    pub content: QuestionContent,
}

impl QuestionDraft {
    /// 分配 ID，生成入库记录
    pub fn into_question(self, id: u64) -> Question {
        Question {
            id,
            stem: self.stem,
            content: self.content,
            explanation: None,
        }
    }
}

/// 答案值：单个文本或有序文本序列
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Text(String),
    Sequence(Vec<String>),
}

/// 用户提交的答案，只在单次请求内存在
#[derive(Debug, Clone, Deserialize)]
pub struct SubmittedAnswer {
    pub question_id: u64,
    pub answer: AnswerValue,
}

/// 单题判题结果，每次判题新建，不落盘
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub correct: bool,
    pub explanation: Option<String>,
    pub correct_answer: AnswerValue,
}

/// 生成试卷请求
#[derive(Debug, Clone, Deserialize)]
pub struct ExamRequest {
    pub num_questions: i64,
    #[serde(default)]
    pub question_types: Option<Vec<QuestionType>>,
    #[serde(default)]
    pub topic: Option<String>,
}
