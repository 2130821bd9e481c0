//! 判题服务 - 业务能力层
//!
//! 只负责"判一道题"能力，不关心题目从哪来
//!
//! 判题策略按题型区分：
//! - 填空题：归一化后比较（忽略大小写与首尾空白）
//! - 选择题：逐字比较（选项文本必须完全一致）
//! - 排序题：逐位归一化比较（顺序敏感，长度不一致直接判错）

use crate::models::{AnswerValue, CheckResult, Question, QuestionContent};
use crate::services::explain_service::ExplainService;

/// 未识别题型的固定提示
pub const UNSUPPORTED_TYPE_MESSAGE: &str = "不支持的题型";

/// 归一化答案：文本去首尾空白并转小写，序列逐项处理
///
/// 纯函数，无副作用，幂等。
pub fn normalize_answer(answer: &AnswerValue) -> AnswerValue {
    match answer {
        AnswerValue::Text(text) => AnswerValue::Text(text.trim().to_lowercase()),
        AnswerValue::Sequence(items) => AnswerValue::Sequence(
            items.iter().map(|item| item.trim().to_lowercase()).collect(),
        ),
    }
}

/// 判定一道题
///
/// 只读取题目状态，不触发任何外部调用。
pub fn check_answer(question: &Question, user_answer: &AnswerValue) -> CheckResult {
    let mut explanation = question.explanation.clone();

    let correct = match &question.content {
        // 归一化后比较；提交的形状不对（序列对文本）自然不相等
        QuestionContent::FillBlank { .. } => {
            normalize_answer(user_answer) == normalize_answer(&question.content.answer())
        }
        QuestionContent::MultipleChoice { answer, .. } => match user_answer {
            // 选择题要求选项文本逐字一致，大小写敏感
            AnswerValue::Text(submitted) => submitted == answer,
            AnswerValue::Sequence(_) => false,
        },
        QuestionContent::SentenceRearrangement { answer, .. } => match user_answer {
            AnswerValue::Sequence(submitted) => {
                submitted.len() == answer.len()
                    && submitted
                        .iter()
                        .zip(answer.iter())
                        .all(|(a, b)| normalize_text(a) == normalize_text(b))
            }
            AnswerValue::Text(_) => false,
        },
        QuestionContent::Unsupported => {
            explanation = Some(UNSUPPORTED_TYPE_MESSAGE.to_string());
            false
        }
    };

    CheckResult {
        correct,
        explanation,
        correct_answer: question.content.answer(),
    }
}

/// 判题并生成解析
///
/// 解析生成成功时覆盖结果中的解析字段；任何生成故障（未配置凭证、
/// 网络错误、超时）都保留原有解析，判题结论不受影响。
pub async fn check_answer_with_explanation(
    explain: &ExplainService,
    question: &Question,
    user_answer: &AnswerValue,
) -> CheckResult {
    let mut result = check_answer(question, user_answer);

    if let Some(text) = explain.generate_explanation(question).await {
        result.explanation = Some(text);
    }

    result
}

fn normalize_text(text: &str) -> String {
    text.trim().to_lowercase()
}
