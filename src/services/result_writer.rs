//! 结果写入服务 - 业务能力层
//!
//! 把一次运行的结果写成 JSON，供表格/幻灯片导出工具读取

use std::path::Path;

use tracing::info;

use crate::error::FileError;
use crate::models::EnrichmentResult;

/// 写入结果文件
pub async fn write_result(path: &Path, result: &EnrichmentResult) -> Result<(), FileError> {
    let json = serde_json::to_string_pretty(result)?;
    tokio::fs::write(path, json)
        .await
        .map_err(|e| FileError::write_failed(path.display().to_string(), e))?;

    info!("💾 结果已保存至: {} ({} 条)", path.display(), result.len());
    Ok(())
}
