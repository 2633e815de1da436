//! UI event types.
//!
//! All external inputs (terminal, timers, clipboard, SMS) are converted to
//! `UiEvent` before being processed by the reducer.

use crossterm::event::Event as CrosstermEvent;
use otp_core::WidgetEvent;
use tokio_util::sync::CancellationToken;

use crate::common::TaskKind;

#[derive(Debug)]
pub enum UiEvent {
    /// Periodic tick for redraws.
    Tick,

    /// Current terminal size, sent before other events each frame.
    Frame { width: u16, height: u16 },

    /// Raw terminal input.
    Terminal(CrosstermEvent),

    /// Event for the OTP widget (timers, clipboard reads, SMS, deferred steps).
    Widget(WidgetEvent),

    /// A background task was spawned; the reducer keeps its cancel token.
    TaskStarted {
        kind: TaskKind,
        cancel: CancellationToken,
    },

    /// A background task finished on its own.
    TaskCompleted { kind: TaskKind },

    /// The SMS listener couldn't be started.
    SmsListenerFailed { error: String },
}
