//! 会话连接管理
//!
//! 独占持有与远端 Agent 的唯一双工连接：open / send / close，并把每个生命周期事件
//! 映射为日志条目与运行状态变化。入站文本的分类与完成判断只在这里发生，
//! 控制器和 UI 不直接接触原始协议事件。

use serde::Serialize;
use tokio::sync::mpsc;

use super::classifier::{classify, is_completion, LogKind};
use super::log_store::{LogEntry, LogStore};
use super::run_state::RunState;
use crate::core::ConsoleError;

/// 连接未收到关闭帧就断开时使用的关闭码
pub const ABNORMAL_CLOSURE: u16 = 1006;
/// 关闭帧不带状态码时使用的关闭码
pub const NO_STATUS_RECEIVED: u16 = 1005;

/// 连接生命周期；Closed / Errored 为终态，不自动重连
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed,
    Errored,
}

impl ConnectionState {
    pub fn is_dead(&self) -> bool {
        matches!(self, ConnectionState::Closed | ConnectionState::Errored)
    }
}

/// 传输层回报的生命周期事件，按传输送达顺序处理
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    Opened,
    Message(String),
    Closed(u16),
    Error(String),
}

/// 传输层抽象：真实实现为 WebSocket，测试中可替换为假实现
pub trait Transport: Send {
    /// 异步发起连接，不阻塞调用方；结果（包括地址解析失败）通过 events 回报
    fn open(&mut self, endpoint: &str, events: mpsc::UnboundedSender<ConnectionEvent>);

    /// 把一行文本交给传输层发送
    fn send(&mut self, text: &str) -> Result<(), ConsoleError>;

    /// 请求终止连接；可重复调用
    fn close(&mut self);
}

/// 连接管理器：构造即打开连接，Drop 时无条件释放
pub struct ConnectionManager<T: Transport> {
    transport: T,
    endpoint: String,
    state: ConnectionState,
    session_id: String,
    released: bool,
}

impl<T: Transport> ConnectionManager<T> {
    pub fn open(
        mut transport: T,
        endpoint: &str,
        events: mpsc::UnboundedSender<ConnectionEvent>,
    ) -> Self {
        let session_id = format!("session_{}", uuid::Uuid::new_v4());
        tracing::info!(session = %session_id, "Connecting to {}", endpoint);
        transport.open(endpoint, events);
        Self {
            transport,
            endpoint: endpoint.to_string(),
            state: ConnectionState::Connecting,
            session_id,
            released: false,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == ConnectionState::Open
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// 只在 Open 状态可发送
    pub fn send(&mut self, text: &str) -> Result<(), ConsoleError> {
        if !self.is_open() {
            return Err(ConsoleError::NotConnected);
        }
        self.transport.send(text)
    }

    pub fn close(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if !self.state.is_dead() {
            tracing::info!(session = %self.session_id, "Closing connection to {}", self.endpoint);
            self.state = ConnectionState::Closed;
        }
        self.transport.close();
    }

    /// 处理一个生命周期事件：追加日志，必要时把运行状态置回 Idle
    pub fn handle(
        &mut self,
        event: ConnectionEvent,
        logs: &mut LogStore,
        run: &mut RunState,
    ) -> LogEntry {
        match event {
            ConnectionEvent::Opened => {
                if self.state == ConnectionState::Connecting {
                    self.state = ConnectionState::Open;
                }
                tracing::info!(session = %self.session_id, "Connected to {}", self.endpoint);
                logs.append(LogKind::Info, format!("Connected to {}", self.endpoint), None)
            }
            ConnectionEvent::Message(text) => {
                let kind = classify(&text);
                tracing::debug!(session = %self.session_id, kind = kind.as_str(), "Agent: {}", text);
                let completed = is_completion(&text);
                let entry = logs.append(kind, text, None);
                if completed && run.finish() {
                    tracing::info!(session = %self.session_id, "Goal finished");
                }
                entry
            }
            ConnectionEvent::Closed(code) => {
                if !self.state.is_dead() {
                    self.state = ConnectionState::Closed;
                }
                tracing::info!(session = %self.session_id, code, "Connection closed");
                run.finish();
                logs.append(
                    LogKind::Info,
                    ConsoleError::TransportClosed(code).to_string(),
                    None,
                )
            }
            ConnectionEvent::Error(reason) => {
                self.state = ConnectionState::Errored;
                tracing::error!(session = %self.session_id, "Connection error: {}", reason);
                run.finish();
                logs.append(
                    LogKind::Error,
                    ConsoleError::TransportError(reason).to_string(),
                    None,
                )
            }
        }
    }
}

impl<T: Transport> Drop for ConnectionManager<T> {
    fn drop(&mut self) {
        self.close();
    }
}
