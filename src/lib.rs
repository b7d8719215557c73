//! # Vocab Enricher
//!
//! 为单词表批量生成 IPA 发音、翻译和双语例句
//!
//! ## 架构设计
//!
//! ### ① 数据层（Models）
//! - `models/` - `WordRecord`、LLM 返回文档的中间表示、运行结果
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个批次
//! - `LlmService` - 一批单词 → 一次 LLM 请求
//! - `normalizer` - 返回文档 → `WordRecord`
//! - `WarnWriter` / `write_result` - 写文件
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一批单词"的处理流程
//! - `retry` - 与请求无关的固定间隔重试
//! - `BatchFlow` - 请求 → 归一化，失败则重试，耗尽后兜底
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 分批、顺序处理、拼接结果、进度
//! - `orchestrator/app` - 应用生命周期
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult, LlmError};
pub use models::{BatchReply, EnrichmentResult, ExampleFormat, Progress, WordRecord};
pub use orchestrator::{App, BatchProcessor};
pub use services::{BatchRequester, LlmService};
pub use workflow::{BatchFlow, RetryPolicy};
