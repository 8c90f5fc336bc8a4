//! 控制台控制器（组合根）
//!
//! 持有连接管理器、日志与运行状态，对表现层只暴露 submit_goal / stop / clear 以及
//! logs / is_running 只读视图。所有状态变化都在调用它的那一次操作或事件中同步完成。

use tokio::sync::mpsc;

use super::classifier::LogKind;
use super::connection::{ConnectionEvent, ConnectionManager, ConnectionState, Transport};
use super::log_store::{LogEntry, LogStore};
use super::run_state::RunState;
use crate::core::ConsoleError;

pub struct ConsoleController<T: Transport> {
    connection: ConnectionManager<T>,
    logs: LogStore,
    run: RunState,
}

impl<T: Transport> ConsoleController<T> {
    /// 进入控制台：写入一条初始日志并发起连接
    pub fn mount(
        transport: T,
        endpoint: &str,
        events: mpsc::UnboundedSender<ConnectionEvent>,
    ) -> Self {
        let mut logs = LogStore::new();
        logs.append(
            LogKind::Info,
            format!("Console ready, connecting to {}", endpoint),
            None,
        );
        let connection = ConnectionManager::open(transport, endpoint, events);
        Self {
            connection,
            logs,
            run: RunState::Idle,
        }
    }

    /// 提交目标：空目标与执行中重复提交记一条拒绝日志后返回错误，不发送、不改变运行状态
    pub fn submit_goal(&mut self, text: &str) -> Result<(), ConsoleError> {
        let goal = text.trim();
        if goal.is_empty() {
            return Err(self.reject(ConsoleError::InvalidInput));
        }
        if self.run.is_running() {
            return Err(self.reject(ConsoleError::GoalInFlight));
        }
        if !self.connection.is_open() {
            tracing::warn!(state = ?self.connection.state(), "Goal rejected, not connected");
            self.logs.append(
                LogKind::Error,
                format!("{}, goal not sent: {}", ConsoleError::NotConnected, goal),
                None,
            );
            return Err(ConsoleError::NotConnected);
        }

        self.logs
            .append(LogKind::Info, format!("Executing goal: {}", goal), None);
        match self.connection.send(goal) {
            Ok(()) => {
                self.run.start();
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to send goal: {}", e);
                self.logs.append(LogKind::Error, e.to_string(), None);
                Err(e)
            }
        }
    }

    fn reject(&mut self, err: ConsoleError) -> ConsoleError {
        tracing::warn!("Goal rejected: {}", err);
        self.logs
            .append(LogKind::Error, format!("Goal rejected: {}", err), None);
        err
    }

    /// 仅本地停止：不关闭连接，也不通知远端 Agent，远端任务会继续执行
    pub fn stop(&mut self) {
        if self.run.finish() {
            tracing::info!("Execution stopped by user");
            self.logs
                .append(LogKind::Error, "Execution stopped by user", None);
        }
    }

    pub fn clear(&mut self) {
        self.logs.clear();
    }

    pub fn handle_event(&mut self, event: ConnectionEvent) -> LogEntry {
        self.connection
            .handle(event, &mut self.logs, &mut self.run)
    }

    pub fn logs(&self) -> &[LogEntry] {
        self.logs.snapshot()
    }

    pub fn is_running(&self) -> bool {
        self.run.is_running()
    }

    pub fn run_state(&self) -> RunState {
        self.run
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.connection.state()
    }

    pub fn endpoint(&self) -> &str {
        self.connection.endpoint()
    }
}
