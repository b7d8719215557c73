use serde::Serialize;

use crate::models::WordRecord;

/// 单批处理摘要
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    /// 批次编号（从1开始）
    pub index: usize,
    /// 本批第一个单词在输入中的位置
    pub start: usize,
    pub size: usize,
    /// 实际尝试次数
    pub attempts: u32,
    /// 是否使用了兜底记录
    pub degraded: bool,
    /// 最后一次失败原因
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

/// 一次完整运行的结果，由调用方持有
#[derive(Debug, Clone, Default, Serialize)]
pub struct EnrichmentResult {
    pub records: Vec<WordRecord>,
    pub batches: Vec<BatchSummary>,
    /// 是否在中途被停止
    pub cancelled: bool,
}

impl EnrichmentResult {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 使用了兜底记录的批次
    pub fn degraded_batches(&self) -> impl Iterator<Item = &BatchSummary> {
        self.batches.iter().filter(|b| b.degraded)
    }

    /// 所有批次都跑完（未被停止）
    pub fn is_complete(&self) -> bool {
        !self.cancelled
    }

    pub(crate) fn push_batch(&mut self, summary: BatchSummary, records: Vec<WordRecord>) {
        self.batches.push(summary);
        self.records.extend(records);
    }
}

/// 进度信号，每批完成后发出
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed_words: usize,
    pub total_words: usize,
    pub batch_index: usize,
    pub total_batches: usize,
}

impl Progress {
    /// 完成比例，范围 [0.0, 1.0]
    pub fn fraction(&self) -> f64 {
        if self.total_words == 0 {
            return 1.0;
        }
        (self.completed_words as f64 / self.total_words as f64).min(1.0)
    }
}
