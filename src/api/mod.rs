//! 控制面板 HTTP 接口：健康检查、仪表盘、设置、元素清单

pub mod client;
pub mod models;

pub use client::{load_dashboard, ControlPanelApi, HttpApiClient};
pub use models::{
    AgentSettings, Dashboard, DashboardStats, ElementDescriptor, ElementInventory, HealthStatus,
    RecentAction,
};
