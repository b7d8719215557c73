//! 单批处理流程 - 流程层
//!
//! 核心职责：定义"一批单词"的完整处理流程
//!
//! 流程顺序：
//! 1. 请求 LLM → 解析返回文档
//! 2. 归一化 → 与原批次对齐
//! 3. 失败则固定间隔重试，次数用完后生成兜底记录

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::LlmError;
use crate::models::{BatchSummary, ExampleFormat, WordRecord};
use crate::services::normalizer::{align_to_batch, matches_any, normalize_reply};
use crate::services::BatchRequester;
use crate::workflow::batch_ctx::BatchCtx;
use crate::workflow::retry::{retry_or_fallback, RetryOutcome, RetryPolicy};

/// 单批处理结果
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// 与输入批次一一对应的记录
    pub records: Vec<WordRecord>,
    pub attempts: u32,
    /// 是否为兜底记录
    pub degraded: bool,
    pub last_error: Option<String>,
}

impl BatchOutcome {
    pub fn summary(&self, ctx: &BatchCtx) -> BatchSummary {
        BatchSummary {
            index: ctx.batch_index,
            start: ctx.start,
            size: self.records.len(),
            attempts: self.attempts,
            degraded: self.degraded,
            last_error: self.last_error.clone(),
        }
    }
}

/// 单批处理流程（重试控制）
///
/// - 系统中唯一的重试边界：按批重试，不按单词
/// - 从不向上返回错误，最坏情况是整批兜底记录
pub struct BatchFlow<R> {
    requester: R,
    policy: RetryPolicy,
    format: ExampleFormat,
}

impl<R: BatchRequester> BatchFlow<R> {
    pub fn new(requester: R, policy: RetryPolicy, format: ExampleFormat) -> Self {
        Self {
            requester,
            policy,
            format,
        }
    }

    /// 按配置创建
    pub fn from_config(requester: R, config: &Config) -> Self {
        Self::new(
            requester,
            RetryPolicy::new(config.max_attempts, config.retry_delay()),
            config.example_format,
        )
    }

    pub async fn run(&self, ctx: &BatchCtx, words: &[String]) -> BatchOutcome {
        let format = self.format;
        let label = ctx.to_string();

        let outcome = retry_or_fallback(
            self.policy,
            &label,
            |attempt| async move {
                debug!("{} 第 {} 次请求，单词数: {}", ctx, attempt, words.len());
                let reply = self.requester.request_batch(words).await?;
                let records = normalize_reply(reply, words, format);
                // 一个单词都对不上时整批都会变成默认值，按失败处理
                if !matches_any(&records, words) {
                    return Err(LlmError::UnmatchedReply {
                        returned: records.len(),
                    });
                }
                Ok::<_, LlmError>(align_to_batch(records, words, format))
            },
            || {
                words
                    .iter()
                    .map(|word| WordRecord::fallback(word.as_str(), format))
                    .collect()
            },
        )
        .await;

        match outcome {
            RetryOutcome::Succeeded { value, attempts } => {
                if attempts > 1 {
                    info!("{} ✓ 第 {} 次尝试成功", ctx, attempts);
                }
                BatchOutcome {
                    records: value,
                    attempts,
                    degraded: false,
                    last_error: None,
                }
            }
            RetryOutcome::Exhausted {
                value,
                attempts,
                last_error,
            } => {
                warn!(
                    "{} ❌ 已重试 {} 次仍失败，本批 {} 个单词使用兜底记录",
                    ctx,
                    attempts,
                    words.len()
                );
                BatchOutcome {
                    records: value,
                    attempts,
                    degraded: true,
                    last_error: last_error.map(|e| e.to_string()),
                }
            }
        }
    }
}
