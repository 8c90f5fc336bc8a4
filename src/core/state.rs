//! UI 投影状态
//!
//! 控制器每次变更后投影出一份 ConsoleState 发布到 watch 通道，UI 只读这份快照渲染。

use serde::Serialize;

use crate::console::{ConnectionState, ConsoleController, LogEntry, RunState, Transport};

#[derive(Clone, Debug, Serialize)]
pub struct ConsoleState {
    pub logs: Vec<LogEntry>,
    pub run_state: RunState,
    pub connection: ConnectionState,
    pub endpoint: String,
    /// 临时提示（空目标、执行中重复提交），下一次变更时清除
    pub notice: Option<String>,
}

impl Default for ConsoleState {
    fn default() -> Self {
        Self {
            logs: Vec::new(),
            run_state: RunState::Idle,
            connection: ConnectionState::Connecting,
            endpoint: String::new(),
            notice: None,
        }
    }
}

impl ConsoleState {
    /// 从控制器投影
    pub fn project<T: Transport>(controller: &ConsoleController<T>, notice: Option<String>) -> Self {
        Self {
            logs: controller.logs().to_vec(),
            run_state: controller.run_state(),
            connection: controller.connection_state(),
            endpoint: controller.endpoint().to_string(),
            notice,
        }
    }

    pub fn is_running(&self) -> bool {
        self.run_state.is_running()
    }
}
