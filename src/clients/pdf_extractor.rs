//! PDF 文本提取客户端
//!
//! 只负责"从字节流里取出纯文本"这件事，不关心后续结构化

use tracing::{debug, warn};

/// 文本提取错误
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// 文档解析失败
    #[error("PDF 解析失败: {0}")]
    Parse(String),
    /// 文档中没有可用文本
    #[error("PDF 中没有可用文本")]
    EmptyText,
}

/// 文本提取能力
pub trait TextExtractor: Send + Sync {
    /// 从文档字节流中提取纯文本，失败或结果为空都按故障处理
    fn extract_text(&self, data: &[u8]) -> Result<String, ExtractError>;
}

/// PDF 文本提取器
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor for PdfExtractor {
    fn extract_text(&self, data: &[u8]) -> Result<String, ExtractError> {
        let text = pdf_extract::extract_text_from_mem(data).map_err(|e| {
            warn!("PDF 文本提取失败: {}", e);
            ExtractError::Parse(e.to_string())
        })?;

        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(ExtractError::EmptyText);
        }

        debug!("PDF 文本提取完成，共 {} 字符", text.chars().count());
        Ok(text)
    }
}
