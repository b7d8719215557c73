//! 应用入口 - 编排层
//!
//! 1. **初始化**：校验配置、初始化日志文件、创建 LLM 服务
//! 2. **加载**：读取单词表
//! 3. **处理**：交给 `BatchProcessor`，每批记录进度
//! 4. **收尾**：写失败批次、写结果文件、输出统计

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use tracing::{info, warn};

use crate::config::Config;
use crate::error::AppResult;
use crate::models::{load_word_list, EnrichmentResult};
use crate::orchestrator::BatchProcessor;
use crate::services::{write_result, LlmService, WarnWriter};
use crate::utils::logging::{
    append_log_line, init_log_file, log_progress, log_startup, log_words_loaded, print_final_stats,
};
use crate::workflow::BatchFlow;

/// 应用主结构
pub struct App {
    config: Config,
    processor: BatchProcessor<LlmService>,
    warn_writer: WarnWriter,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> AppResult<Self> {
        config.validate()?;

        // 初始化日志文件
        init_log_file(&config.output_log_file)?;

        log_startup(&config);

        if config.llm_api_key.is_empty() {
            warn!("⚠️ 未设置 LLM_API_KEY，请求很可能会失败");
        }

        let flow = BatchFlow::from_config(LlmService::new(&config), &config);
        let processor = BatchProcessor::new(flow, config.batch_size);
        let warn_writer = WarnWriter::with_path(&config.warn_file);

        Ok(Self {
            config,
            processor,
            warn_writer,
        })
    }

    /// 运行应用主逻辑
    ///
    /// `stop` 被置位后不再开始下一批，已完成的批次照常写出。
    pub async fn run(&self, stop: &AtomicBool) -> AppResult<EnrichmentResult> {
        let words = load_word_list(Path::new(&self.config.input_file)).await?;

        if words.is_empty() {
            warn!("⚠️ 单词表为空，程序结束");
            return Ok(EnrichmentResult::default());
        }

        log_words_loaded(words.len(), self.config.batch_size);

        let started = Instant::now();
        let result = self
            .processor
            .process_until(
                &words,
                || stop.load(Ordering::SeqCst),
                |progress| log_progress(&progress),
            )
            .await;

        self.record_batches(&words, &result).await?;
        write_result(Path::new(&self.config.output_file), &result).await?;

        print_final_stats(&result, started.elapsed().as_secs_f64(), &self.config);

        Ok(result)
    }

    /// 把每批摘要写进日志文件，兜底批次另写 warn 文件
    async fn record_batches(&self, words: &[String], result: &EnrichmentResult) -> AppResult<()> {
        for summary in &result.batches {
            append_log_line(
                &self.config.output_log_file,
                &format!(
                    "批次 {} | 单词 {}-{} | 尝试 {} 次 | {}",
                    summary.index,
                    summary.start + 1,
                    summary.start + summary.size,
                    summary.attempts,
                    if summary.degraded { "兜底" } else { "成功" }
                ),
            )?;
        }

        for summary in result.degraded_batches() {
            let batch_words = words
                .get(summary.start..summary.start + summary.size)
                .unwrap_or_default();
            self.warn_writer.write(summary, batch_words).await?;
        }

        let degraded = result.degraded_batches().count();
        if degraded > 0 {
            info!("📝 {} 个失败批次已写入 {}", degraded, self.config.warn_file);
        }
        Ok(())
    }
}
