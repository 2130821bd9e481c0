use serde::{Deserialize, Serialize};

/// 题型枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    /// 填空题
    FillBlank,
    /// 选择题
    MultipleChoice,
    /// 排序题（把打乱的词排成完整句子）
    SentenceRearrangement,
}

impl QuestionType {
    /// 全部题型
    pub const ALL: [QuestionType; 3] = [
        QuestionType::FillBlank,
        QuestionType::MultipleChoice,
        QuestionType::SentenceRearrangement,
    ];

    /// 获取线上标识
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionType::FillBlank => "fill_blank",
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::SentenceRearrangement => "sentence_rearrangement",
        }
    }

    /// 获取标准名称
    pub fn name(self) -> &'static str {
        match self {
            QuestionType::FillBlank => "填空题",
            QuestionType::MultipleChoice => "选择题",
            QuestionType::SentenceRearrangement => "排序题",
        }
    }

    /// 从线上标识解析题型
    pub fn from_value(value: &str) -> Option<Self> {
        match value {
            "fill_blank" => Some(QuestionType::FillBlank),
            "multiple_choice" => Some(QuestionType::MultipleChoice),
            "sentence_rearrangement" => Some(QuestionType::SentenceRearrangement),
            _ => None,
        }
    }
}
