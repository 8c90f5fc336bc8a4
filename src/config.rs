//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `WEBAGENT__*` 覆盖（双下划线表示嵌套，如 `WEBAGENT__CONSOLE__ENDPOINT=ws://host:8000/ws/chat`）。

use std::path::PathBuf;

use serde::Deserialize;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    #[serde(default)]
    pub console: ConsoleSection,
    #[serde(default)]
    pub api: ApiSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

/// [console] 段：Agent 会话端点与界面刷新间隔
#[derive(Debug, Clone, Deserialize)]
pub struct ConsoleSection {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// 键盘轮询间隔（毫秒）
    #[serde(default = "default_tick_millis")]
    pub tick_millis: u64,
}

impl Default for ConsoleSection {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            tick_millis: default_tick_millis(),
        }
    }
}

fn default_endpoint() -> String {
    "ws://localhost:8000/ws/chat".to_string()
}

fn default_tick_millis() -> u64 {
    100
}

/// [api] 段：控制面板 HTTP 接口（dashboard / settings / elements）
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSection {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_api_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_api_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_api_timeout_secs() -> u64 {
    10
}

/// [logging] 段：TUI 占用终端，tracing 输出写入文件
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSection {
    #[serde(default = "default_log_file")]
    pub file: PathBuf,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            file: default_log_file(),
        }
    }
}

fn default_log_file() -> PathBuf {
    PathBuf::from("webagent-console.log")
}

/// 从 config 目录加载配置，环境变量 WEBAGENT__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 WEBAGENT__*（双下划线表示嵌套键）
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("WEBAGENT")
            .separator("__")
            .try_parsing(true),
    );

    let c = builder.build()?;
    c.try_deserialize()
}
