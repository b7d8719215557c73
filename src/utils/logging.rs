//! 日志工具模块
//!
//! 提供日志初始化、格式化和输出的辅助函数

use std::fs::{self, OpenOptions};
use std::io::Write;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::error::FileError;
use crate::models::{BatchSummary, EnrichmentResult, Progress};
use crate::workflow::BatchCtx;

/// 初始化 tracing 日志
///
/// `RUST_LOG` 优先；否则默认 info，`verbose` 时为 debug。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> Result<(), FileError> {
    let log_header = format!(
        "{}\n单词生成日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header).map_err(|e| FileError::write_failed(log_file_path, e))
}

/// 向日志文件追加一行
pub fn append_log_line(log_file_path: &str, line: &str) -> Result<(), FileError> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)
        .map_err(|e| FileError::write_failed(log_file_path, e))?;
    writeln!(file, "{}", line).map_err(|e| FileError::write_failed(log_file_path, e))
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 单词发音/翻译/例句生成");
    info!("🤖 模型: {}", config.llm_model_name);
    info!(
        "📊 每批 {} 个单词，最多尝试 {} 次，间隔 {} 秒",
        config.batch_size, config.max_attempts, config.retry_delay_secs
    );
    info!("{}", "=".repeat(60));
}

/// 记录单词加载信息
pub fn log_words_loaded(total: usize, batch_size: usize) {
    info!("✓ 找到 {} 个待处理的单词", total);
    info!("📋 将以每批 {} 个的方式处理", batch_size);
}

/// 记录批次开始信息
///
/// # 参数
/// - `ctx`: 批次上下文
/// - `start`: 起始单词编号（从1开始）
/// - `end`: 结束单词编号
/// - `total`: 单词总数
pub fn log_batch_start(ctx: &BatchCtx, start: usize, end: usize, total: usize) {
    info!("{}", "─".repeat(60));
    info!("📦 {} 开始处理: 单词 {}-{} / 共 {} 个", ctx, start, end, total);
}

/// 记录批次完成信息
pub fn log_batch_complete(summary: &BatchSummary) {
    if summary.degraded {
        info!(
            "✗ 第 {} 批使用兜底记录 (尝试 {} 次)",
            summary.index, summary.attempts
        );
    } else {
        info!(
            "✓ 第 {} 批完成: {} 个单词 (尝试 {} 次)",
            summary.index, summary.size, summary.attempts
        );
    }
}

/// 记录进度
pub fn log_progress(progress: &Progress) {
    info!(
        "📈 进度: {:.0}% ({}/{})",
        progress.fraction() * 100.0,
        progress.completed_words,
        progress.total_words
    );
}

/// 打印最终统计信息
pub fn print_final_stats(result: &EnrichmentResult, elapsed_secs: f64, config: &Config) {
    let degraded_words: usize = result.degraded_batches().map(|b| b.size).sum();

    info!("{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("实际耗时: {:.2} 秒", elapsed_secs);
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", result.len() - degraded_words, result.len());
    info!("❌ 兜底: {}", degraded_words);
    if result.cancelled {
        info!("⏹️ 运行被中途停止");
    }
    info!("{}", "=".repeat(60));
    info!("日志已保存至: {}", config.output_log_file);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
