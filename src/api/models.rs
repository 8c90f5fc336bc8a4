//! 控制面板 HTTP 接口的数据结构（与后端 JSON 一一对应）

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// GET /health
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}

/// GET /api/dashboard
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Dashboard {
    pub stats: DashboardStats,
    #[serde(default)]
    pub recent_actions: Vec<RecentAction>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct DashboardStats {
    pub elements_inspected: u64,
    /// 后端以字符串返回（如 "2h 15m"）
    pub total_runtime: String,
    pub success_rate: f64,
    pub failed_actions: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RecentAction {
    pub id: u64,
    pub action: String,
    pub time: String,
    pub status: String,
}

/// GET / POST /api/settings
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct AgentSettings {
    pub max_elements: u32,
    pub loop_limit: u32,
    /// 单位：秒
    pub wait_time: f64,
    pub debug_mode: bool,
    pub auto_screenshot: bool,
    pub headless_mode: bool,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            max_elements: 1000,
            loop_limit: 100,
            wait_time: 10.0,
            debug_mode: false,
            auto_screenshot: false,
            headless_mode: false,
        }
    }
}

/// 单个可交互元素；除固定字段外，其余属性（id、name、href、placeholder…）原样保留
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ElementDescriptor {
    pub tag: String,
    #[serde(default)]
    pub text: Option<String>,
    pub selector_type: String,
    pub selector: String,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

/// GET /api/elements：来源 URL → 该页面的元素列表（保持后端顺序）
pub type ElementInventory = BTreeMap<String, Vec<ElementDescriptor>>;
