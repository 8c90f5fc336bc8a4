//! 控制台主循环
//!
//! 控制器只属于一个后台任务：该任务逐个处理用户命令（Submit/Stop/Clear/Quit）与传输事件，
//! 每次处理完把投影状态发布到 watch 通道；同一时刻排队的多个传输事件合并为一次发布。任务结束时控制器被 drop，连接随之释放。

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::config::AppConfig;
use crate::console::{ConsoleController, Transport, WsTransport};
use crate::core::ConsoleState;

/// 从 UI 发往控制台的用户命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// 提交目标
    Submit(String),
    /// 本地停止当前目标
    Stop,
    /// 清空日志
    Clear,
    /// 退出控制台
    Quit,
}

/// 以 WebSocket 传输启动控制台，端点取自 [console] 配置
pub fn create_console(
    cfg: &AppConfig,
) -> (
    mpsc::UnboundedSender<Command>,
    watch::Receiver<ConsoleState>,
    JoinHandle<()>,
) {
    spawn_console(WsTransport::new(), cfg.console.endpoint.clone())
}

/// 在后台任务中挂载控制器并运行主循环；返回命令发送端、状态接收端与任务句柄
pub fn spawn_console<T: Transport + 'static>(
    transport: T,
    endpoint: String,
) -> (
    mpsc::UnboundedSender<Command>,
    watch::Receiver<ConsoleState>,
    JoinHandle<()>,
) {
    let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel::<Command>();
    let (state_tx, state_rx) = watch::channel(ConsoleState::default());

    let handle = tokio::spawn(async move {
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let mut controller = ConsoleController::mount(transport, &endpoint, event_tx);
        let _ = state_tx.send(ConsoleState::project(&controller, None));

        loop {
            tokio::select! {
                cmd = cmd_rx.recv() => {
                    let notice = match cmd {
                        Some(Command::Submit(goal)) => match controller.submit_goal(&goal) {
                            Err(e) if e.is_transient() => Some(e.to_string()),
                            _ => None,
                        },
                        Some(Command::Stop) => {
                            controller.stop();
                            None
                        }
                        Some(Command::Clear) => {
                            controller.clear();
                            None
                        }
                        Some(Command::Quit) | None => break,  // cmd_tx 已关闭也视为退出
                    };
                    let _ = state_tx.send(ConsoleState::project(&controller, notice));
                }
                Some(event) = event_rx.recv() => {
                    controller.handle_event(event);
                    // 已排队的事件一并处理，只发布一次快照
                    while let Ok(event) = event_rx.try_recv() {
                        controller.handle_event(event);
                    }
                    let _ = state_tx.send(ConsoleState::project(&controller, None));
                }
            }
        }

        tracing::info!("Console loop finished, releasing connection");
    });

    (cmd_tx, state_rx, handle)
}
