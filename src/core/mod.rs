//! 核心层：错误类型、UI 投影状态、控制台主循环

pub mod error;
pub mod orchestrator;
pub mod state;

pub use error::ConsoleError;
pub use orchestrator::{create_console, spawn_console, Command};
pub use state::ConsoleState;
