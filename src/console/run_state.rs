//! 运行状态机：Idle / Running，无子状态

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    #[default]
    Idle,
    Running,
}

impl RunState {
    pub fn is_running(&self) -> bool {
        matches!(self, RunState::Running)
    }

    /// 目标已发出，进入 Running
    pub fn start(&mut self) {
        *self = RunState::Running;
    }

    /// 回到 Idle；返回之前是否在运行
    pub fn finish(&mut self) -> bool {
        let was_running = self.is_running();
        *self = RunState::Idle;
        was_running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions() {
        let mut state = RunState::default();
        assert_eq!(state, RunState::Idle);
        assert!(!state.finish());
        state.start();
        assert!(state.is_running());
        assert!(state.finish());
        assert_eq!(state, RunState::Idle);
    }
}
