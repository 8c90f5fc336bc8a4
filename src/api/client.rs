//! 控制面板 HTTP 客户端
//!
//! 控制台之外的协作方（仪表盘、设置、元素清单）只通过这些接口读写；ControlPanelApi 便于在测试中替换。

use std::time::Duration;

use async_trait::async_trait;

use super::models::{AgentSettings, Dashboard, ElementInventory, HealthStatus};
use crate::config::ApiSection;
use crate::core::ConsoleError;

#[async_trait]
pub trait ControlPanelApi: Send + Sync {
    async fn health(&self) -> Result<HealthStatus, ConsoleError>;

    async fn dashboard(&self) -> Result<Dashboard, ConsoleError>;

    async fn settings(&self) -> Result<AgentSettings, ConsoleError>;

    /// 保存设置，返回后端确认后的值
    async fn update_settings(&self, settings: &AgentSettings) -> Result<AgentSettings, ConsoleError>;

    async fn elements(&self) -> Result<ElementInventory, ConsoleError>;
}

pub struct HttpApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl HttpApiClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ConsoleError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn from_config(section: &ApiSection) -> Result<Self, ConsoleError> {
        Self::new(&section.base_url, section.timeout_secs)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ConsoleError> {
        let response = self.http.get(self.url(path)).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ConsoleError::Api(format!("GET {} failed: {} - {}", path, status, body)));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl ControlPanelApi for HttpApiClient {
    async fn health(&self) -> Result<HealthStatus, ConsoleError> {
        self.get("health").await
    }

    async fn dashboard(&self) -> Result<Dashboard, ConsoleError> {
        self.get("api/dashboard").await
    }

    async fn settings(&self) -> Result<AgentSettings, ConsoleError> {
        self.get("api/settings").await
    }

    async fn update_settings(&self, settings: &AgentSettings) -> Result<AgentSettings, ConsoleError> {
        let response = self
            .http
            .post(self.url("api/settings"))
            .json(settings)
            .send()
            .await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ConsoleError::Api(format!(
                "POST api/settings failed: {} - {}",
                status, body
            )));
        }
        Ok(response.json().await?)
    }

    async fn elements(&self) -> Result<ElementInventory, ConsoleError> {
        self.get("api/elements").await
    }
}

/// 启动时读取一次仪表盘；失败只记警告，不影响控制台
pub async fn load_dashboard(api: &dyn ControlPanelApi) -> Option<Dashboard> {
    match api.dashboard().await {
        Ok(dashboard) => {
            tracing::info!(
                recent_actions = dashboard.recent_actions.len(),
                "Dashboard loaded"
            );
            Some(dashboard)
        }
        Err(e) => {
            tracing::warn!("Dashboard unavailable: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;
    use crate::api::models::DashboardStats;

    struct StaticApi {
        dashboard: Option<Dashboard>,
    }

    #[async_trait]
    impl ControlPanelApi for StaticApi {
        async fn health(&self) -> Result<HealthStatus, ConsoleError> {
            Ok(HealthStatus {
                status: "ok".to_string(),
            })
        }

        async fn dashboard(&self) -> Result<Dashboard, ConsoleError> {
            self.dashboard
                .clone()
                .ok_or_else(|| ConsoleError::Api("503 Service Unavailable".to_string()))
        }

        async fn settings(&self) -> Result<AgentSettings, ConsoleError> {
            Ok(AgentSettings::default())
        }

        async fn update_settings(&self, settings: &AgentSettings) -> Result<AgentSettings, ConsoleError> {
            Ok(settings.clone())
        }

        async fn elements(&self) -> Result<ElementInventory, ConsoleError> {
            Ok(ElementInventory::new())
        }
    }

    #[test]
    fn test_url_join() {
        let client = HttpApiClient::new("http://localhost:8000/", 5).unwrap();
        assert_eq!(client.url("/api/dashboard"), "http://localhost:8000/api/dashboard");
        assert_eq!(client.url("health"), "http://localhost:8000/health");
    }

    #[tokio::test]
    async fn test_load_dashboard() {
        let dashboard = Dashboard {
            stats: DashboardStats {
                elements_inspected: 10,
                total_runtime: "5m".to_string(),
                success_rate: 100.0,
                failed_actions: 0,
            },
            recent_actions: vec![],
        };
        let api = StaticApi {
            dashboard: Some(dashboard.clone()),
        };
        assert_eq!(load_dashboard(&api).await, Some(dashboard));

        let down = StaticApi { dashboard: None };
        assert!(load_dashboard(&down).await.is_none());
    }

    /// 本地 HTTP 服务：按顺序为每个连接返回一条预置响应，并记录 (请求行, 请求体)
    async fn canned_server(
        responses: Vec<(&'static str, String)>,
    ) -> (String, Arc<Mutex<Vec<(String, String)>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = requests.clone();

        tokio::spawn(async move {
            for (status, body) in responses {
                let (mut stream, _) = listener.accept().await.unwrap();
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                let header_end = loop {
                    let n = stream.read(&mut chunk).await.unwrap();
                    assert!(n > 0, "client hung up before sending headers");
                    buf.extend_from_slice(&chunk[..n]);
                    if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                        break pos + 4;
                    }
                };
                let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
                let content_length = head
                    .lines()
                    .filter_map(|l| l.split_once(':'))
                    .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, v)| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                while buf.len() < header_end + content_length {
                    let n = stream.read(&mut chunk).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    buf.extend_from_slice(&chunk[..n]);
                }
                let request_line = head.lines().next().unwrap_or_default().to_string();
                let request_body = String::from_utf8_lossy(&buf[header_end..]).to_string();
                seen.lock().unwrap().push((request_line, request_body));

                let reply = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                stream.write_all(reply.as_bytes()).await.unwrap();
                let _ = stream.shutdown().await;
            }
        });

        (format!("http://{}", addr), requests)
    }

    #[tokio::test]
    async fn test_settings_round_trip_over_http() {
        let saved = AgentSettings {
            max_elements: 500,
            loop_limit: 20,
            wait_time: 2.5,
            debug_mode: true,
            auto_screenshot: false,
            headless_mode: true,
        };
        let echoed = serde_json::to_string(&saved).unwrap();
        let (base, requests) = canned_server(vec![
            ("200 OK", serde_json::to_string(&AgentSettings::default()).unwrap()),
            ("200 OK", echoed),
        ])
        .await;
        let client = HttpApiClient::new(&base, 5).unwrap();

        assert_eq!(client.settings().await.unwrap(), AgentSettings::default());
        assert_eq!(client.update_settings(&saved).await.unwrap(), saved);

        let requests = requests.lock().unwrap();
        assert!(requests[0].0.starts_with("GET /api/settings "));
        assert!(requests[1].0.starts_with("POST /api/settings "));
        let posted: AgentSettings = serde_json::from_str(&requests[1].1).unwrap();
        assert_eq!(posted, saved);
    }

    #[tokio::test]
    async fn test_elements_and_dashboard_over_http() {
        let elements = r##"{
            "https://example.com/signup": [
                {"tag": "input", "text": null, "selector_type": "css", "selector": "#email", "name": "email"},
                {"tag": "button", "text": "Sign up", "selector_type": "xpath", "selector": "//button[1]"}
            ]
        }"##;
        let dashboard = r#"{
            "stats": {"elements_inspected": 42, "total_runtime": "1h 5m", "success_rate": 97.5, "failed_actions": 1},
            "recent_actions": [{"id": 1, "action": "Clicked submit", "time": "2 mins ago", "status": "success"}]
        }"#;
        let (base, requests) = canned_server(vec![
            ("200 OK", elements.to_string()),
            ("200 OK", dashboard.to_string()),
        ])
        .await;
        let client = HttpApiClient::new(&base, 5).unwrap();

        let inventory = client.elements().await.unwrap();
        let page = &inventory["https://example.com/signup"];
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].selector, "#email");
        assert_eq!(page[0].attributes["name"], "email");
        assert_eq!(page[1].text.as_deref(), Some("Sign up"));

        let loaded = load_dashboard(&client).await.unwrap();
        assert_eq!(loaded.stats.elements_inspected, 42);
        assert_eq!(loaded.recent_actions[0].action, "Clicked submit");

        let requests = requests.lock().unwrap();
        assert!(requests[0].0.starts_with("GET /api/elements "));
        assert!(requests[1].0.starts_with("GET /api/dashboard "));
    }

    #[tokio::test]
    async fn test_error_status_is_api_error() {
        let (base, _requests) = canned_server(vec![
            ("503 Service Unavailable", r#"{"detail":"browser busy"}"#.to_string()),
            ("500 Internal Server Error", r#"{"detail":"db locked"}"#.to_string()),
        ])
        .await;
        let client = HttpApiClient::new(&base, 5).unwrap();

        match client.health().await {
            Err(ConsoleError::Api(msg)) => {
                assert!(msg.contains("503"));
                assert!(msg.contains("browser busy"));
            }
            other => panic!("expected Api error, got {:?}", other),
        }
        match client.update_settings(&AgentSettings::default()).await {
            Err(ConsoleError::Api(msg)) => {
                assert!(msg.starts_with("POST api/settings failed"));
                assert!(msg.contains("500"));
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_server_is_api_error() {
        let client = HttpApiClient::new("http://127.0.0.1:9", 2).unwrap();
        assert!(matches!(client.health().await, Err(ConsoleError::Api(_))));
    }
}
