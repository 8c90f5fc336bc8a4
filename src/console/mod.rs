//! 实时会话控制台：消息分类、日志、连接管理、运行状态与控制器

pub mod classifier;
pub mod connection;
pub mod controller;
pub mod log_store;
pub mod run_state;
pub mod transport;

pub use classifier::{classify, is_completion, LogKind};
pub use connection::{ConnectionEvent, ConnectionManager, ConnectionState, Transport};
pub use controller::ConsoleController;
pub use log_store::{LogEntry, LogStore};
pub use run_state::RunState;
pub use transport::WsTransport;
