//! LLM 客户端
//!
//! 只负责"调一次文本生成服务"这件事，不关心提示词内容
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务

use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use futures::future::BoxFuture;
use tracing::{debug, warn};

use crate::config::Config;

/// 文本生成错误
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// API key 未配置
    #[error("LLM API key 未配置")]
    MissingApiKey,
    /// API 调用失败
    #[error("LLM API 调用失败: {0}")]
    Api(String),
    /// 返回内容为空
    #[error("LLM 返回内容为空")]
    EmptyContent,
    /// 返回内容无法解析为题目列表
    #[error("LLM 返回内容无法解析: {0}")]
    BadPayload(String),
    /// 调用超时
    #[error("LLM API 调用超时 ({0} 秒)")]
    Timeout(u64),
}

/// 文本生成能力
///
/// 判题、解析、出题各服务只依赖这个接口，测试时注入确定性假实现。
pub trait TextGenerator: Send + Sync {
    /// 凭证是否已配置（未配置时调用方应直接跳过请求）
    fn is_configured(&self) -> bool;

    /// 发送一次对话请求，返回去除首尾空白的响应文本
    fn complete<'a>(
        &'a self,
        system_prompt: &'a str,
        user_prompt: &'a str,
    ) -> BoxFuture<'a, Result<String, GenerateError>>;
}

/// LLM 客户端
pub struct LlmClient {
    client: Client<OpenAIConfig>,
    model_name: String,
    timeout_secs: u64,
    configured: bool,
}

impl LlmClient {
    /// 创建新的 LLM 客户端
    pub fn new(config: &Config) -> Self {
        // 配置 OpenAI 客户端（兼容 OpenAI API 的服务）
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        let client = Client::with_config(openai_config);

        Self {
            client,
            model_name: config.llm_model_name.clone(),
            timeout_secs: config.llm_timeout_secs,
            configured: !config.llm_api_key.trim().is_empty(),
        }
    }
}

impl TextGenerator for LlmClient {
    fn is_configured(&self) -> bool {
        self.configured
    }

    fn complete<'a>(
        &'a self,
        system_prompt: &'a str,
        user_prompt: &'a str,
    ) -> BoxFuture<'a, Result<String, GenerateError>> {
        Box::pin(async move {
            if !self.configured {
                return Err(GenerateError::MissingApiKey);
            }

            debug!("调用 LLM API，模型: {}", self.model_name);
            debug!("用户消息长度: {} 字符", user_prompt.chars().count());

            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(system_prompt)
                .build()
                .map_err(|e| GenerateError::Api(e.to_string()))?;

            let user_msg = ChatCompletionRequestUserMessageArgs::default()
                .content(user_prompt)
                .build()
                .map_err(|e| GenerateError::Api(e.to_string()))?;

            let request = CreateChatCompletionRequestArgs::default()
                .model(&self.model_name)
                .messages(vec![
                    ChatCompletionRequestMessage::System(system_msg),
                    ChatCompletionRequestMessage::User(user_msg),
                ])
                .temperature(0.7)
                .max_tokens(1024u32)
                .build()
                .map_err(|e| GenerateError::Api(e.to_string()))?;

            // 对每次外部调用施加显式超时，超时视为一次生成故障
            let response = tokio::time::timeout(
                Duration::from_secs(self.timeout_secs),
                self.client.chat().create(request),
            )
            .await
            .map_err(|_| {
                warn!("LLM API 调用超时 ({} 秒)", self.timeout_secs);
                GenerateError::Timeout(self.timeout_secs)
            })?
            .map_err(|e| {
                warn!("LLM API 调用失败: {}", e);
                GenerateError::Api(e.to_string())
            })?;

            debug!("LLM API 调用成功");

            let content = response
                .choices
                .first()
                .and_then(|choice| choice.message.content.clone())
                .ok_or(GenerateError::EmptyContent)?;

            Ok(content.trim().to_string())
        })
    }
}
