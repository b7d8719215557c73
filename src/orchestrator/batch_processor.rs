//! 批量单词处理器 - 编排层
//!
//! ## 职责
//!
//! 1. **分批**：按固定大小把单词表切成连续的批次，最后一批可以更小
//! 2. **顺序处理**：一批一批地交给 `BatchFlow`，不并发
//! 3. **拼接结果**：按批次顺序追加记录，输出与输入一一对应
//! 4. **进度**：每批完成后发出一次进度
//! 5. **停止**：只在两批之间检查停止标志
//!
//! `BatchFlow` 从不返回错误，所以这里没有批次级的错误处理。

use tracing::{info, warn};

use crate::models::{EnrichmentResult, Progress};
use crate::services::BatchRequester;
use crate::utils::logging::{log_batch_complete, log_batch_start};
use crate::workflow::{BatchCtx, BatchFlow};

/// 批量处理器
pub struct BatchProcessor<R> {
    flow: BatchFlow<R>,
    batch_size: usize,
}

impl<R: BatchRequester> BatchProcessor<R> {
    /// `batch_size` 为 0 时按 1 处理
    pub fn new(flow: BatchFlow<R>, batch_size: usize) -> Self {
        Self {
            flow,
            batch_size: batch_size.max(1),
        }
    }

    /// 处理全部单词
    pub async fn process<F>(&self, words: &[String], on_progress: F) -> EnrichmentResult
    where
        F: FnMut(Progress),
    {
        self.process_until(words, || false, on_progress).await
    }

    /// 处理全部单词，每批开始前调用 `should_stop`，返回 true 则不再开始下一批
    pub async fn process_until<S, F>(
        &self,
        words: &[String],
        should_stop: S,
        mut on_progress: F,
    ) -> EnrichmentResult
    where
        S: Fn() -> bool,
        F: FnMut(Progress),
    {
        let total_words = words.len();
        let total_batches = total_words.div_ceil(self.batch_size);
        let mut result = EnrichmentResult {
            records: Vec::with_capacity(total_words),
            ..Default::default()
        };

        for (idx, batch) in words.chunks(self.batch_size).enumerate() {
            if should_stop() {
                warn!(
                    "⏹️ 收到停止请求，已完成 {}/{} 批",
                    idx, total_batches
                );
                result.cancelled = true;
                break;
            }

            let start = idx * self.batch_size;
            let ctx = BatchCtx::new(idx + 1, total_batches, start);
            log_batch_start(&ctx, start + 1, start + batch.len(), total_words);

            let outcome = self.flow.run(&ctx, batch).await;
            let summary = outcome.summary(&ctx);
            log_batch_complete(&summary);

            result.push_batch(summary, outcome.records);

            on_progress(Progress {
                completed_words: result.records.len(),
                total_words,
                batch_index: idx + 1,
                total_batches,
            });
        }

        info!(
            "✓ 处理结束: {} 个单词，{} 批，兜底 {} 批",
            result.len(),
            result.batches.len(),
            result.degraded_batches().count()
        );

        result
    }
}
