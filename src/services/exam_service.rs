//! 组卷服务 - 业务能力层
//!
//! 只负责"按请求拼出一份试卷"能力，抽题委托给题库

use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::{ExamRequest, Question};
use crate::store::QuestionBank;

/// 按请求组一份试卷
///
/// 题目顺序以题库产出为准，返回后在一次考试会话内保持不变。
pub async fn assemble_exam(
    bank: &QuestionBank,
    request: &ExamRequest,
) -> AppResult<Vec<Question>> {
    if request.num_questions <= 0 {
        return Err(AppError::invalid_input("题目数量必须大于 0"));
    }

    let questions = bank
        .get_random_questions(
            request.num_questions as usize,
            request.question_types.as_deref(),
            request.topic.as_deref(),
        )
        .await;

    if questions.is_empty() {
        return Err(AppError::not_found("无法生成试卷"));
    }

    info!("✓ 组卷完成，共 {} 题", questions.len());
    Ok(questions)
}
