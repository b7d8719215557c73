use async_trait::async_trait;

use crate::error::LlmError;
use crate::models::BatchReply;

/// 一批单词 → 一次外部生成请求
///
/// 成功时返回解析好的文档，条目可能缺字段；网络错误、非成功状态、
/// 无法解析的返回内容都统一作为 `Err` 交给重试层。
#[async_trait]
pub trait BatchRequester: Send + Sync {
    async fn request_batch(&self, words: &[String]) -> Result<BatchReply, LlmError>;
}

