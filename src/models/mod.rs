pub mod question;
pub mod question_type;

pub use question::{
    AnswerValue, CheckResult, ExamRequest, Question, QuestionContent, QuestionDraft,
    SubmittedAnswer,
};
pub use question_type::QuestionType;
