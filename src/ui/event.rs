//! 事件处理
//!
//! 轮询 crossterm 键盘事件，将 Ctrl+C/Ctrl+S/Esc、Ctrl+L、Ctrl+Q 转为 Command（Stop/Clear/Quit），
//! 其余按键交给 run_app 拼 input_buffer，Enter 时 send_submit。

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;

use crate::core::Command;

/// 应用事件：来自快捷键的 Command 或原始 KeyEvent
#[derive(Debug, Clone)]
pub enum AppEvent {
    Command(Command),
    Key(KeyEvent),
}

/// 事件处理器：持有 cmd_tx，poll 时读键盘并返回 AppEvent
pub struct EventHandler {
    cmd_tx: mpsc::UnboundedSender<Command>,
    tick: Duration,
}

impl EventHandler {
    pub fn new(cmd_tx: mpsc::UnboundedSender<Command>, tick: Duration) -> Self {
        Self { cmd_tx, tick }
    }

    pub fn poll(&self) -> anyhow::Result<Option<AppEvent>> {
        if event::poll(self.tick)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(Some(self.handle_key(key)));
                }
            }
        }
        Ok(None)
    }

    /// 快捷键直接转发给控制台（Quit 由 run_app 负责退出循环）
    pub fn handle_key(&self, key: KeyEvent) -> AppEvent {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let command = match key.code {
            KeyCode::Char('c') | KeyCode::Char('s') if ctrl => Some(Command::Stop),
            KeyCode::Esc => Some(Command::Stop),
            KeyCode::Char('l') if ctrl => Some(Command::Clear),
            KeyCode::Char('q') if ctrl => Some(Command::Quit),
            _ => None,
        };
        match command {
            Some(cmd) => {
                if cmd != Command::Quit {
                    let _ = self.cmd_tx.send(cmd.clone());
                }
                AppEvent::Command(cmd)
            }
            None => AppEvent::Key(key),
        }
    }

    pub fn send_submit(&self, input: String) {
        let _ = self.cmd_tx.send(Command::Submit(input));
    }
}
