pub mod llm_client;
pub mod pdf_extractor;

pub use llm_client::{GenerateError, LlmClient, TextGenerator};
pub use pdf_extractor::{ExtractError, PdfExtractor, TextExtractor};
