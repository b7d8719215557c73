//! 警告写入服务 - 业务能力层
//!
//! 只负责"把失败批次写进 warn.txt"能力，不关心流程

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::FileError;
use crate::models::BatchSummary;

/// 警告写入服务
///
/// 职责：
/// - 把重试耗尽、使用了兜底记录的批次写入 warn.txt
/// - 每批一行，方便之后手动补跑
pub struct WarnWriter {
    warn_file_path: String,
}

impl WarnWriter {
    /// 创建新的警告写入服务
    pub fn new() -> Self {
        Self {
            warn_file_path: "warn.txt".to_string(),
        }
    }

    /// 使用自定义文件路径创建
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            warn_file_path: path.into(),
        }
    }

    /// 写入一个失败批次
    ///
    /// # 参数
    /// - `summary`: 批次摘要
    /// - `words`: 本批单词
    pub async fn write(&self, summary: &BatchSummary, words: &[String]) -> Result<(), FileError> {
        debug!(
            "写入警告: 批次 {} | 单词数: {}",
            summary.index,
            words.len()
        );

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.warn_file_path)
            .await
            .map_err(|e| FileError::write_failed(&self.warn_file_path, e))?;

        let warn_msg = format_warn_line(summary, words);

        file.write_all(warn_msg.as_bytes())
            .await
            .map_err(|e| FileError::write_failed(&self.warn_file_path, e))?;
        // tokio 的写入在后台线程完成，返回前必须等它落盘
        file.flush()
            .await
            .map_err(|e| FileError::write_failed(&self.warn_file_path, e))?;

        Ok(())
    }
}

impl Default for WarnWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn format_warn_line(summary: &BatchSummary, words: &[String]) -> String {
    format!(
        "批次 {} | 位置 {}-{} | 尝试 {} 次 | 原因: {} | 单词: {}\n",
        summary.index,
        summary.start + 1,
        summary.start + summary.size,
        summary.attempts,
        summary.last_error.as_deref().unwrap_or("未知"),
        words.join(", ")
    )
}
