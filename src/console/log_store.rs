//! 会话日志：只追加、有序、写入后不可变
//!
//! id 从 1 开始严格递增；clear 之后从 1 重新计数。时间戳在追加时取本地时间，不由远端提供。

use chrono::Local;
use serde::Serialize;

use super::classifier::LogKind;

/// 单条已分类日志
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub id: u64,
    /// 捕获时间（HH:MM:SS）
    pub timestamp: String,
    pub kind: LogKind,
    pub message: String,
    /// 补充说明；目前没有生产者设置它
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug)]
pub struct LogStore {
    entries: Vec<LogEntry>,
    next_id: u64,
}

impl LogStore {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }

    /// 追加到尾部，返回新条目的副本
    pub fn append(
        &mut self,
        kind: LogKind,
        message: impl Into<String>,
        details: Option<String>,
    ) -> LogEntry {
        let entry = LogEntry {
            id: self.next_id,
            timestamp: Local::now().format("%H:%M:%S").to_string(),
            kind,
            message: message.into(),
            details,
        };
        self.next_id += 1;
        self.entries.push(entry.clone());
        entry
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.next_id = 1;
    }

    pub fn snapshot(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for LogStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_follow_append_order() {
        let mut store = LogStore::new();
        let kinds = [LogKind::Info, LogKind::Tool, LogKind::Error, LogKind::Success];
        for (i, kind) in kinds.iter().enumerate() {
            let entry = store.append(*kind, format!("line {}", i), None);
            assert_eq!(entry.id, i as u64 + 1);
        }
        let ids: Vec<u64> = store.snapshot().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(store.snapshot()[2].message, "line 2");
    }

    #[test]
    fn test_clear_resets_counter() {
        let mut store = LogStore::new();
        for i in 0..5 {
            store.append(LogKind::Info, format!("entry {}", i), None);
        }
        store.clear();
        assert!(store.is_empty());
        let entry = store.append(LogKind::Info, "after clear", None);
        assert_eq!(entry.id, 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_snapshot_is_non_destructive() {
        let mut store = LogStore::new();
        store.append(LogKind::Tool, "clicked", Some("button #3".to_string()));
        assert_eq!(store.snapshot().len(), 1);
        assert_eq!(store.snapshot().len(), 1);
        assert_eq!(store.snapshot()[0].details.as_deref(), Some("button #3"));
        assert_eq!(store.snapshot()[0].timestamp.len(), 8);
    }
}
