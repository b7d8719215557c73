//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量单词处理器
//! - 把单词表切成固定大小的连续批次
//! - 顺序处理，每批完成后发出进度
//! - 按批次顺序拼接结果
//!
//! ### `app` - 应用入口
//! - 管理应用生命周期（初始化、运行、收尾）
//! - 加载单词表、写结果文件和失败记录
//!
//! ## 层次关系
//!
//! ```text
//! app (配置、文件)
//!     ↓
//! batch_processor (处理 Vec<String>)
//!     ↓
//! workflow::BatchFlow (处理单个批次，负责重试)
//!     ↓
//! services (能力层：LLM 请求 / 归一化 / 写文件)
//! ```

pub mod app;
pub mod batch_processor;

pub use app::App;
pub use batch_processor::BatchProcessor;
