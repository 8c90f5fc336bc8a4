//! 界面渲染
//!
//! 顶部状态栏显示连接状态、运行状态与仪表盘统计；主体为会话日志（按类别着色、按宽度换行）；
//! 底部为目标输入框与快捷键提示。

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap},
    Frame,
};

use crate::api::Dashboard;
use crate::console::{ConnectionState, LogEntry, LogKind};
use crate::core::ConsoleState;

fn kind_style(kind: LogKind) -> (&'static str, Color) {
    match kind {
        LogKind::Info => ("INFO", Color::Gray),
        LogKind::Success => ("DONE", Color::Green),
        LogKind::Error => ("FAIL", Color::Red),
        LogKind::Tool => ("TOOL", Color::Cyan),
    }
}

fn connection_label(state: ConnectionState) -> (&'static str, Color) {
    match state {
        ConnectionState::Connecting => ("连接中…", Color::Yellow),
        ConnectionState::Open => ("已连接", Color::Green),
        ConnectionState::Closed => ("已断开", Color::DarkGray),
        ConnectionState::Errored => ("连接错误", Color::Red),
    }
}

/// 将内容按宽度换行，支持 UTF-8（按字符数，避免在 UTF-8 中间截断）
pub fn wrap_text(s: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![s.to_string()];
    }
    let mut lines = Vec::new();
    for para in s.split('\n') {
        let mut line = String::new();
        for ch in para.chars() {
            if line.chars().count() >= width {
                lines.push(std::mem::take(&mut line));
            }
            line.push(ch);
        }
        if !line.is_empty() {
            lines.push(line);
        }
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// 单条日志 → 若干渲染行：首行带 id、时间与类别，续行缩进对齐
pub fn entry_lines(entry: &LogEntry, width: usize) -> Vec<Line<'static>> {
    let (label, color) = kind_style(entry.kind);
    let prefix = format!("#{:<4} {} {} ", entry.id, entry.timestamp, label);
    let indent = " ".repeat(prefix.chars().count());
    let body_width = width.saturating_sub(prefix.chars().count()).max(20);

    let mut lines = Vec::new();
    for (i, chunk) in wrap_text(&entry.message, body_width).into_iter().enumerate() {
        let pref = if i == 0 { prefix.clone() } else { indent.clone() };
        lines.push(Line::from(vec![
            Span::styled(pref, Style::default().fg(color).add_modifier(Modifier::BOLD)),
            Span::styled(chunk, Style::default().fg(color)),
        ]));
    }
    if let Some(details) = &entry.details {
        for chunk in wrap_text(details, body_width) {
            lines.push(Line::from(vec![
                Span::raw(indent.clone()),
                Span::styled(chunk, Style::default().fg(Color::DarkGray)),
            ]));
        }
    }
    lines
}

/// ratatui 的滚动偏移是 u16，超长日志停在最大值
pub fn scroll_row(offset: usize) -> u16 {
    u16::try_from(offset).unwrap_or(u16::MAX)
}

/// 绘制一帧；将 (总行数, 可视高度) 写入 out 供外部 clamp 滚动
pub fn draw(
    f: &mut Frame,
    state: &ConsoleState,
    dashboard: Option<&Dashboard>,
    input_buffer: &str,
    log_scroll: usize,
    out: &mut (usize, usize),
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(f.area());

    // 状态栏
    let (conn_label, conn_color) = connection_label(state.connection);
    let (run_label, run_color) = if state.is_running() {
        ("运行中", Color::Yellow)
    } else {
        ("空闲", Color::Gray)
    };
    let mut status = vec![
        Span::styled(conn_label, Style::default().fg(conn_color).add_modifier(Modifier::BOLD)),
        Span::raw(format!(" {} │ ", state.endpoint)),
        Span::styled(run_label, Style::default().fg(run_color).add_modifier(Modifier::BOLD)),
    ];
    if let Some(d) = dashboard {
        status.push(Span::styled(
            format!(
                " │ 元素 {} · 运行 {} · 成功率 {:.1}% · 失败 {}",
                d.stats.elements_inspected,
                d.stats.total_runtime,
                d.stats.success_rate,
                d.stats.failed_actions
            ),
            Style::default().fg(Color::DarkGray),
        ));
    }
    let header = Paragraph::new(Line::from(status)).block(
        Block::default()
            .title(" WebAgent Console ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    f.render_widget(header, chunks[0]);

    // 日志区
    let log_area = chunks[1];
    let content_width = log_area.width.saturating_sub(2).saturating_sub(1) as usize; // 边框 + 滚动条
    let text_lines: Vec<Line> = state
        .logs
        .iter()
        .flat_map(|entry| entry_lines(entry, content_width))
        .collect();

    let content_height = log_area.height.saturating_sub(2) as usize;
    let total_lines = text_lines.len();
    let max_scroll = total_lines.saturating_sub(content_height);
    let scroll_offset = log_scroll.min(max_scroll);

    let block = Block::default()
        .title(format!(" 会话日志 ({}) ", state.logs.len()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue));
    let paragraph = Paragraph::new(Text::from(text_lines))
        .block(block)
        .scroll((scroll_row(scroll_offset), 0));
    f.render_widget(paragraph, log_area);

    if total_lines > content_height {
        let mut scrollbar_state = ScrollbarState::new(total_lines)
            .position(scroll_offset)
            .viewport_content_length(content_height);
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .thumb_symbol("█")
            .track_symbol(Some("░"));
        f.render_stateful_widget(scrollbar, log_area, &mut scrollbar_state);
    }

    // 输入区
    let input_title = if let Some(notice) = &state.notice {
        format!(" {} ", notice)
    } else if state.is_running() {
        " 目标执行中… ".to_string()
    } else {
        " 输入目标 ".to_string()
    };
    let border_color = if state.notice.is_some() {
        Color::Red
    } else {
        Color::Blue
    };
    let hint = " Enter 执行 │ Esc/Ctrl+S 停止 │ Ctrl+L 清空 │ ↑↓ PgUp/PgDn 滚动 │ Ctrl+Q 退出 ";
    let input_block = Block::default()
        .title(input_title)
        .title_bottom(Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
    let input = Paragraph::new(input_buffer)
        .block(input_block)
        .wrap(Wrap { trim: false })
        .style(if state.is_running() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        });
    f.render_widget(input, chunks[2]);

    out.0 = total_lines;
    out.1 = content_height;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(message: &str, details: Option<&str>) -> LogEntry {
        LogEntry {
            id: 7,
            timestamp: "12:00:01".to_string(),
            kind: LogKind::Tool,
            message: message.to_string(),
            details: details.map(str::to_string),
        }
    }

    #[test]
    fn test_wrap_text_utf8() {
        assert_eq!(wrap_text("点击按钮成功", 4), vec!["点击按钮", "成功"]);
        assert_eq!(wrap_text("", 10), vec![""]);
    }

    #[test]
    fn test_scroll_row_saturates() {
        assert_eq!(scroll_row(42), 42);
        assert_eq!(scroll_row(65_535), u16::MAX);
        assert_eq!(scroll_row(70_000), u16::MAX);
        assert_eq!(scroll_row(usize::MAX), u16::MAX);
    }

    #[test]
    fn test_entry_lines() {
        let lines = entry_lines(&entry("Tool clicked button #3", None), 80);
        assert_eq!(lines.len(), 1);
        let first: String = lines[0].spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(first.starts_with("#7"));
        assert!(first.contains("TOOL"));
        assert!(first.ends_with("Tool clicked button #3"));

        let with_details = entry_lines(&entry("clicked", Some("selector: #submit")), 80);
        assert_eq!(with_details.len(), 2);
    }
}
