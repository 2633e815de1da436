//! Effect handlers for the TUI runtime.
//!
//! These functions perform I/O and wait on timers. They never touch state;
//! everything they learn is sent to the inbox as a `UiEvent`.

use std::time::Duration;

use otp_core::clipboard::ClipboardSource;
use otp_core::sms::SmsSubscription;
use otp_core::{PlatformError, WidgetEvent};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::inbox::UiEventSender;
use crate::events::UiEvent;

/// Sends `AutoFocusDue` once `delay` has elapsed.
pub async fn auto_focus(delay: Duration, tx: UiEventSender, cancel: CancellationToken) {
    tokio::select! {
        () = cancel.cancelled() => {}
        () = tokio::time::sleep(delay) => {
            let _ = tx.send(UiEvent::Widget(WidgetEvent::AutoFocusDue));
        }
    }
}

/// Opens the clipboard once, then reads it immediately and every `interval`.
///
/// Stops when the clipboard can't be opened or a read task panics.
pub async fn clipboard_poll<S, F>(
    open: F,
    interval: Duration,
    tx: UiEventSender,
    cancel: CancellationToken,
) where
    S: ClipboardSource + 'static,
    F: FnOnce() -> Result<S, PlatformError> + Send + 'static,
{
    let mut source = match tokio::task::spawn_blocking(open).await {
        Ok(Ok(source)) => source,
        Ok(Err(e)) => {
            debug!(error = %e, "clipboard unavailable, not polling");
            return;
        }
        Err(e) => {
            debug!(error = %e, "clipboard open task failed");
            return;
        }
    };

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {
                let Some((returned, result)) = read_clipboard(source).await else {
                    break;
                };
                source = returned;
                if cancel.is_cancelled() {
                    break;
                }
                if tx.send(UiEvent::Widget(WidgetEvent::ClipboardPolled(result))).is_err() {
                    break;
                }
            }
        }
    }
    debug!("clipboard poll stopped");
}

/// Reads on the blocking pool and hands the source back.
async fn read_clipboard<S>(mut source: S) -> Option<(S, Result<String, PlatformError>)>
where
    S: ClipboardSource + 'static,
{
    tokio::task::spawn_blocking(move || {
        let result = source.read_text();
        (source, result)
    })
    .await
    .ok()
}

/// Forwards messages from an SMS subscription until cancelled.
pub async fn forward_sms(
    mut subscription: SmsSubscription,
    tx: UiEventSender,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            () = cancel.cancelled() => break,
            message = subscription.recv() => {
                let Some(message) = message else {
                    break;
                };
                if tx.send(UiEvent::Widget(WidgetEvent::SmsReceived(message))).is_err() {
                    break;
                }
            }
        }
    }
    debug!("SMS forwarding stopped");
}
