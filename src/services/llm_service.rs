//! LLM 服务 - 业务能力层
//!
//! 只负责"为一批单词生成发音、翻译和例句"这一能力，不关心重试和分批
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务（如 Azure, Gemini, Doubao 等）

use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use backoff::ExponentialBackoffBuilder;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::LlmError;
use crate::models::BatchReply;
use crate::services::BatchRequester;
use crate::utils::logging::truncate_text;

/// LLM 服务
///
/// 职责：
/// - 为一批单词构建提示词并调用 LLM
/// - 把返回文本解析成 `BatchReply`
/// - 不重试，不保存任何状态
pub struct LlmService {
    client: Client<OpenAIConfig>,
    model_name: String,
    temperature: f32,
    source_language: String,
    target_language: String,
}

impl LlmService {
    /// 创建新的 LLM 服务
    pub fn new(config: &Config) -> Self {
        // 配置 OpenAI 客户端（兼容 OpenAI API 的服务）
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        // 关闭客户端自带的指数退避：每次调用只发一次 HTTP 请求，重试只在批次层做
        let no_retry = ExponentialBackoffBuilder::new()
            .with_max_elapsed_time(Some(Duration::ZERO))
            .build();
        let client = Client::with_config(openai_config).with_backoff(no_retry);

        Self {
            client,
            model_name: config.llm_model_name.clone(),
            temperature: config.temperature,
            source_language: config.source_language.clone(),
            target_language: config.target_language.clone(),
        }
    }

    /// 通用的 LLM 调用函数
    ///
    /// # 参数
    /// - `user_message`: 用户消息内容
    /// - `system_message`: 系统消息（可选）
    ///
    /// # 返回
    /// 返回 LLM 的响应内容（字符串）
    pub async fn send_to_llm(
        &self,
        user_message: &str,
        system_message: Option<&str>,
    ) -> Result<String, LlmError> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", user_message.len());

        let mut messages = Vec::new();

        if let Some(sys_msg) = system_message {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg)
                .build()
                .map_err(LlmError::build_failed)?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()
            .map_err(LlmError::build_failed)?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(self.temperature)
            .max_tokens(2048u32)
            .build()
            .map_err(LlmError::build_failed)?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            LlmError::api_failed(&self.model_name, e)
        })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| LlmError::EmptyContent {
                model: self.model_name.clone(),
            })?;

        Ok(content.trim().to_string())
    }

    /// 构建单批请求的消息
    ///
    /// 返回 (user_message, system_message)
    fn build_batch_messages(&self, words: &[String]) -> (String, String) {
        let system_message = format!(
            "You are a helpful assistant. Always respond in the following JSON format: \
             {{\"translations\": [{{\"word\": \"<word>\", \"ipa\": \"<IPA pronunciation>\", \
             \"translation\": \"<{target} translations>\", \"example\": \"<short {source} sentence>\", \
             \"example_translation\": \"<{target} translation of the example>\"}}]}}",
            source = self.source_language,
            target = self.target_language,
        );

        // serde_json 序列化字符串数组不会失败
        let words_json = serde_json::to_string(words).unwrap_or_default();

        let user_message = format!(
            "Provide IPA pronunciation, a list of {target} translations, and a very short {source} \
             sentence for toddlers along with its {target} translation. \
             Return exactly one entry per word and echo each word unchanged in the \"word\" field. \
             Here are the words: {words}.",
            source = self.source_language,
            target = self.target_language,
            words = words_json,
        );

        (user_message, system_message)
    }
}

#[async_trait]
impl BatchRequester for LlmService {
    async fn request_batch(&self, words: &[String]) -> Result<BatchReply, LlmError> {
        if words.is_empty() {
            return Err(LlmError::EmptyBatch);
        }

        let (user_message, system_message) = self.build_batch_messages(words);
        let response = self.send_to_llm(&user_message, Some(&system_message)).await?;

        debug!("LLM 返回: {}", truncate_text(&response, 200));

        let reply = BatchReply::from_llm_output(&response).map_err(|source| {
            LlmError::MalformedResponse {
                snippet: truncate_text(&response, 80),
                source,
            }
        })?;

        if reply.translations.is_empty() {
            return Err(LlmError::EmptyContent {
                model: self.model_name.clone(),
            });
        }

        Ok(reply)
    }
}
