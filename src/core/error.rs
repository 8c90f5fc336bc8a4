//! 控制台错误类型
//!
//! 所有会话错误都在本地处理：追加一条日志并（必要时）把运行状态置回 Idle，不会让控制台失去交互能力。

use thiserror::Error;

/// 控制台运行过程中可能出现的错误（连接、输入、传输、HTTP 接口、配置）
#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("Not connected to agent")]
    NotConnected,

    #[error("Goal must not be empty")]
    InvalidInput,

    /// 已有目标在执行中，不排队
    #[error("A goal is already running")]
    GoalInFlight,

    #[error("Send failed: {0}")]
    SendFailed(String),

    #[error("Transport error: {0}")]
    TransportError(String),

    #[error("Connection closed (code: {0})")]
    TransportClosed(u16),

    #[error("API error: {0}")]
    Api(String),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}

impl ConsoleError {
    /// 是否只需提示（不写入日志）：空目标与执行中重复提交
    pub fn is_transient(&self) -> bool {
        matches!(self, ConsoleError::InvalidInput | ConsoleError::GoalInFlight)
    }
}

impl From<reqwest::Error> for ConsoleError {
    fn from(e: reqwest::Error) -> Self {
        ConsoleError::Api(e.to_string())
    }
}
