//! WebAgent Console - Web 自动化 Agent 的实时会话控制台
//!
//! 模块划分：
//! - **api**: 控制面板 HTTP 接口（健康检查、仪表盘、设置、元素清单）
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **console**: 消息分类、会话日志、连接管理、运行状态、控制器
//! - **core**: 错误类型、UI 投影状态、控制台主循环
//! - **observability**: tracing 初始化
//! - **ui**: Ratatui TUI 界面

pub mod api;
pub mod config;
pub mod console;
pub mod core;
pub mod observability;
pub mod ui;
