use tokio_util::sync::CancellationToken;

/// Background work the runtime spawns on behalf of the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    AutoFocus,
    ClipboardPoll,
    SmsListener,
}

/// Task lifecycle state (stored in AppState, mutated only by reducer).
#[derive(Debug, Default, Clone)]
pub struct TaskState {
    pub cancel: Option<CancellationToken>,
}

impl TaskState {
    pub fn is_running(&self) -> bool {
        self.cancel.is_some()
    }

    pub fn on_started(&mut self, cancel: CancellationToken) {
        // A restart replaces the previous run.
        if let Some(previous) = self.cancel.replace(cancel) {
            previous.cancel();
        }
    }

    /// Takes the token so the caller can cancel it.
    pub fn take(&mut self) -> Option<CancellationToken> {
        self.cancel.take()
    }

    pub fn clear(&mut self) {
        self.cancel = None;
    }
}

#[derive(Debug, Default, Clone)]
pub struct Tasks {
    pub auto_focus: TaskState,
    pub clipboard_poll: TaskState,
    pub sms_listener: TaskState,
}

impl Tasks {
    pub fn state_mut(&mut self, kind: TaskKind) -> &mut TaskState {
        match kind {
            TaskKind::AutoFocus => &mut self.auto_focus,
            TaskKind::ClipboardPoll => &mut self.clipboard_poll,
            TaskKind::SmsListener => &mut self.sms_listener,
        }
    }

    pub fn is_any_running(&self) -> bool {
        self.auto_focus.is_running()
            || self.clipboard_poll.is_running()
            || self.sms_listener.is_running()
    }

    /// Cancels every running task.
    pub fn cancel_all(&mut self) {
        for kind in [
            TaskKind::AutoFocus,
            TaskKind::ClipboardPoll,
            TaskKind::SmsListener,
        ] {
            if let Some(token) = self.state_mut(kind).take() {
                token.cancel();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restart_cancels_previous_run() {
        let mut state = TaskState::default();
        let first = CancellationToken::new();
        state.on_started(first.clone());
        state.on_started(CancellationToken::new());
        assert!(first.is_cancelled());
        assert!(state.is_running());
    }

    #[test]
    fn test_cancel_all() {
        let mut tasks = Tasks::default();
        let token = CancellationToken::new();
        tasks.state_mut(TaskKind::ClipboardPoll).on_started(token.clone());
        assert!(tasks.is_any_running());

        tasks.cancel_all();
        assert!(token.is_cancelled());
        assert!(!tasks.is_any_running());
    }
}
