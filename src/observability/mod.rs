//! 可观测性：tracing 订阅器
//!
//! TUI 占用终端，日志写入文件；默认级别 info，可通过 RUST_LOG 覆盖。
//! 配置的日志文件打不开时退到临时目录，再不行就丢弃日志，控制台照常启动。

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// 日志最终写到哪里
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSink {
    /// 配置的路径
    Configured(PathBuf),
    /// 配置路径不可写，改写到临时目录
    Fallback(PathBuf),
    /// 都不可写，日志被丢弃
    Discarded,
}

/// 依次尝试配置路径与 fallback_dir 下的同名文件
pub fn open_log_file(log_file: &Path, fallback_dir: &Path) -> (Option<File>, LogSink) {
    if let Ok(file) = File::create(log_file) {
        return (Some(file), LogSink::Configured(log_file.to_path_buf()));
    }
    let name = log_file
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "webagent-console.log".into());
    let fallback = fallback_dir.join(name);
    match File::create(&fallback) {
        Ok(file) => (Some(file), LogSink::Fallback(fallback)),
        Err(_) => (None, LogSink::Discarded),
    }
}

/// 安装全局订阅器；文件问题不会失败，只有重复安装才返回错误
pub fn init(log_file: &Path) -> anyhow::Result<LogSink> {
    let (file, sink) = open_log_file(log_file, &std::env::temp_dir());
    let writer = match file {
        Some(file) => BoxMakeWriter::new(Mutex::new(file)),
        None => BoxMakeWriter::new(io::sink),
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .try_init()?;
    Ok(sink)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_path_used() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("console.log");
        let (file, sink) = open_log_file(&path, dir.path());
        assert!(file.is_some());
        assert_eq!(sink, LogSink::Configured(path.clone()));
        assert!(path.exists());
    }

    #[test]
    fn test_unwritable_path_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let fallback_dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("console.log");
        let (file, sink) = open_log_file(&path, fallback_dir.path());
        assert!(file.is_some());
        assert_eq!(sink, LogSink::Fallback(fallback_dir.path().join("console.log")));
    }

    #[test]
    fn test_nothing_writable_discards() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let (file, sink) = open_log_file(&missing.join("console.log"), &missing.join("tmp"));
        assert!(file.is_none());
        assert_eq!(sink, LogSink::Discarded);
    }
}
