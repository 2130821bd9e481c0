pub mod answer_service;
pub mod exam_service;
pub mod explain_service;
pub mod generate_service;
pub mod ingest_service;

pub use answer_service::{check_answer, check_answer_with_explanation, normalize_answer};
pub use exam_service::assemble_exam;
pub use explain_service::ExplainService;
pub use generate_service::GenerateService;
pub use ingest_service::IngestService;
