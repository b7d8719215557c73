//! 批次处理上下文
//!
//! 封装"我正在处理第几批、从第几个单词开始"这一信息

use std::fmt::Display;

/// 批次处理上下文
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchCtx {
    /// 批次编号（从1开始）
    pub batch_index: usize,

    /// 批次总数（仅用于日志显示）
    pub total_batches: usize,

    /// 本批第一个单词在输入中的位置（从0开始）
    pub start: usize,
}

impl BatchCtx {
    /// 创建新的批次上下文
    pub fn new(batch_index: usize, total_batches: usize, start: usize) -> Self {
        Self {
            batch_index,
            total_batches,
            start,
        }
    }
}

impl Display for BatchCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[批次 {}/{}]", self.batch_index, self.total_batches)
    }
}
