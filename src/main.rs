//! WebAgent Console
//!
//! 入口：加载配置、初始化日志、读取一次仪表盘、启动控制台主循环与 TUI；
//! 无论 TUI 如何退出，都会通知控制台退出并等待连接释放。

use std::time::Duration;

use anyhow::Context;
use webagent_console::api::{load_dashboard, HttpApiClient};
use webagent_console::config::{load_config, AppConfig};
use webagent_console::core::{create_console, Command};
use webagent_console::observability::{self, LogSink};
use webagent_console::ui::run_app;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (cfg, config_err) = match load_config(None) {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    match observability::init(&cfg.logging.file) {
        Ok(LogSink::Configured(_)) => {}
        Ok(LogSink::Fallback(path)) => tracing::warn!(
            "Cannot write log file {}, logging to {}",
            cfg.logging.file.display(),
            path.display()
        ),
        Ok(LogSink::Discarded) => {}
        // 订阅器装不上不影响控制台本身
        Err(e) => eprintln!("Logging disabled: {}", e),
    }
    if let Some(e) = config_err {
        tracing::warn!("Config load failed ({}), using defaults", e);
    }

    let dashboard = match HttpApiClient::from_config(&cfg.api) {
        Ok(api) => load_dashboard(&api).await,
        Err(e) => {
            tracing::warn!("API client unavailable: {}", e);
            None
        }
    };

    let (cmd_tx, state_rx, console) = create_console(&cfg);

    let result = run_app(
        state_rx,
        cmd_tx.clone(),
        dashboard,
        Duration::from_millis(cfg.console.tick_millis),
    )
    .await;

    // 正常退出已发过 Quit；出错路径在这里补发，确保连接被关闭
    let _ = cmd_tx.send(Command::Quit);
    drop(cmd_tx);
    console.await.context("Console task panicked")?;

    result.context("App run failed")
}
