use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use tracing::warn;
use vocab_enricher::utils::logging;
use vocab_enricher::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::load()?;

    // 初始化日志
    logging::init(config.verbose_logging);

    // Ctrl-C 后不再开始下一批
    let stop = Arc::new(AtomicBool::new(false));
    let stop_signal = stop.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("⏹️ 收到 Ctrl-C，当前批次完成后停止");
            stop_signal.store(true, Ordering::SeqCst);
        }
    });

    // 初始化并运行应用
    let app = App::initialize(config)?;
    app.run(&stop).await?;

    Ok(())
}
