//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! Widget effects that only touch UI state (focus, blur, code notifications)
//! are resolved inside the reducer; what remains here is task spawning,
//! cancellation and deferred dispatch.

use std::time::Duration;

use otp_core::WidgetEvent;
use tokio_util::sync::CancellationToken;

use crate::common::TaskKind;

#[derive(Debug)]
pub enum UiEffect {
    /// Quit the application.
    Quit,

    /// Feed an event back to the widget on the next frame.
    Dispatch(WidgetEvent),

    /// Send `AutoFocusDue` after `delay`.
    StartAutoFocus { delay: Duration },

    /// Read the clipboard every `interval`.
    StartClipboardPoll { interval: Duration },

    /// Register with the SMS retriever and forward messages.
    StartSmsListener,

    /// Unregister from the SMS retriever.
    StopSmsListener,

    /// Cancel a running task.
    CancelTask {
        kind: TaskKind,
        token: Option<CancellationToken>,
    },
}
