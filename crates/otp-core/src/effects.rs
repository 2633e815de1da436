//! Effects returned by the controller and the widget reducer.
//!
//! The reducer only mutates its own state and returns effects; hosts execute
//! them in order. Field commands are fire-and-forget: the reducer never waits
//! for confirmation that focus actually moved.

use std::time::Duration;

/// Commands and notifications for the host to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OtpEffect {
    /// Give input focus to the field at this index.
    FocusField(usize),
    /// Remove input focus from the field at this index.
    BlurField(usize),
    /// Second step of an auto-fill backspace: clear this field.
    ///
    /// Hosts dispatch `WidgetEvent::ClearField` after executing every effect
    /// that precedes this one.
    ClearField(usize),

    /// The joined code changed (fired on every digit mutation).
    CodeChanged(String),
    /// The code reached `pin_count` characters.
    CodeFilled(String),
    /// Per-field focus callback.
    FieldFocused(usize),
    /// Per-field blur callback.
    FieldBlurred(usize),

    /// Run `WidgetEvent::AutoFocusDue` after `delay`.
    ScheduleAutoFocus { delay: Duration },
    CancelAutoFocus,

    /// Poll the clipboard every `interval`, reporting `WidgetEvent::ClipboardPolled`.
    StartClipboardPoll { interval: Duration },
    StopClipboardPoll,

    /// Subscribe to incoming SMS, reporting `WidgetEvent::SmsReceived`.
    StartSmsListener,
    StopSmsListener,
}
