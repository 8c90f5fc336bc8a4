//! 消息分类：把 Agent 发来的自由文本行映射为日志类别
//!
//! 规则表按优先级顺序匹配（大小写不敏感的子串匹配）：失败信号优先于工具/成功信号，
//! 因此 "tool failed" 归为 Error 而不是 Tool。

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// 日志条目类别（封闭枚举）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    Info,
    Success,
    Error,
    Tool,
}

impl LogKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogKind::Info => "info",
            LogKind::Success => "success",
            LogKind::Error => "error",
            LogKind::Tool => "tool",
        }
    }
}

/// (触发词, 类别)，按顺序求值
const RULES: &[(&[&str], LogKind)] = &[
    (&["error", "fail"], LogKind::Error),
    (&["tool", "clicked"], LogKind::Tool),
    (&["completed", "success"], LogKind::Success),
];

/// 对一行文本分类；任何输入（包括空串）都有结果，落空时为 Info
pub fn classify(text: &str) -> LogKind {
    let lower = text.to_lowercase();
    RULES
        .iter()
        .find(|(words, _)| words.iter().any(|w| lower.contains(w)))
        .map(|(_, kind)| *kind)
        .unwrap_or(LogKind::Info)
}

fn completion_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)completed|done|success|satisfied").expect("completion pattern is valid")
    })
}

/// 是否包含完成短语（Agent 没有显式的「回合结束」标记，只能靠此启发式）
pub fn is_completion(text: &str) -> bool {
    completion_pattern().is_match(text)
}
