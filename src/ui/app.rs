//! TUI 应用主循环
//!
//! 进入全屏/原始模式，轮询 state_rx 与键盘事件，将目标输入与快捷键转为 Command 发送给控制台，
//! 每帧用 draw 渲染 ConsoleState 与输入缓冲。退出路径（包括出错）都会恢复终端。

use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::event::KeyCode;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::{mpsc, watch};

use crate::api::Dashboard;
use crate::core::{Command, ConsoleState};
use crate::ui::event::{AppEvent, EventHandler};
use crate::ui::render::draw;

/// 运行 TUI：启用原始模式与全屏，循环 poll 事件 + 渲染，退出时恢复终端
pub async fn run_app(
    state_rx: watch::Receiver<ConsoleState>,
    cmd_tx: mpsc::UnboundedSender<Command>,
    dashboard: Option<Dashboard>,
    tick: Duration,
) -> anyhow::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, state_rx, cmd_tx, dashboard.as_ref(), tick).await;

    restore_terminal(&mut terminal)?;
    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    mut state_rx: watch::Receiver<ConsoleState>,
    cmd_tx: mpsc::UnboundedSender<Command>,
    dashboard: Option<&Dashboard>,
    tick: Duration,
) -> anyhow::Result<()> {
    let event_handler = EventHandler::new(cmd_tx.clone(), tick);
    let mut input_buffer = String::new();
    let mut log_scroll = 0usize;
    let mut last_log_len = 0usize;
    let mut state = state_rx.borrow().clone();

    loop {
        // 只在控制台发布新状态时复制快照
        if state_rx.has_changed().unwrap_or(false) {
            state = state_rx.borrow_and_update().clone();
        }

        // 新日志到达时跟随到底部
        if state.logs.len() != last_log_len {
            last_log_len = state.logs.len();
            log_scroll = usize::MAX;
        }

        if let Some(ev) = event_handler.poll()? {
            match ev {
                AppEvent::Command(Command::Quit) => {
                    let _ = cmd_tx.send(Command::Quit);
                    break;
                }
                AppEvent::Command(Command::Clear) => {
                    input_buffer.clear();
                    log_scroll = 0;
                }
                AppEvent::Command(_) => {}
                AppEvent::Key(key) => match key.code {
                    KeyCode::Enter => {
                        let input = std::mem::take(&mut input_buffer);
                        event_handler.send_submit(input);
                    }
                    KeyCode::Backspace => {
                        input_buffer.pop();
                    }
                    KeyCode::Char(c) => {
                        input_buffer.push(c);
                    }
                    KeyCode::Up => {
                        log_scroll = log_scroll.saturating_sub(1);
                    }
                    KeyCode::Down => {
                        log_scroll = log_scroll.saturating_add(1);
                    }
                    KeyCode::PageUp => {
                        log_scroll = log_scroll.saturating_sub(10);
                    }
                    KeyCode::PageDown => {
                        log_scroll = log_scroll.saturating_add(10);
                    }
                    KeyCode::Home => {
                        log_scroll = 0;
                    }
                    KeyCode::End => {
                        log_scroll = usize::MAX;
                    }
                    _ => {}
                },
            }
        }

        let mut scroll_info = (0usize, 0usize);
        terminal.draw(|f| {
            draw(
                f,
                &state,
                dashboard,
                &input_buffer,
                log_scroll,
                &mut scroll_info,
            );
        })?;
        let (total_lines, viewport_height) = scroll_info;
        log_scroll = log_scroll.min(total_lines.saturating_sub(viewport_height));

        tokio::task::yield_now().await;
    }

    Ok(())
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> anyhow::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
