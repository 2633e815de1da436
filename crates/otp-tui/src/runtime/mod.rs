//! TUI runtime - owns terminal, runs event loop, executes effects.
//!
//! This is the "Elm runtime" boundary: all side effects happen here.
//! The reducer stays pure and produces effects; this module executes them.
//!
//! ## Inbox Pattern
//!
//! - Handlers send `UiEvent`s directly to `inbox_tx`
//! - Runtime drains `inbox_rx` each frame to collect results
//!
//! Structure:
//! - `mod.rs`: Core runtime (OtpRuntime, event loop, effect dispatch)
//! - `inbox.rs`: Inbox channel types
//! - `handlers.rs`: Timer, clipboard and SMS task bodies

mod handlers;
mod inbox;

use std::future::Future;
use std::io::Stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use inbox::{UiEventReceiver, UiEventSender};
use otp_core::config::Config;
use otp_core::sms::SmsBridge;
use otp_core::{Capabilities, WidgetEvent};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::clipboard::SystemClipboard;
use crate::common::TaskKind;
use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::AppState;
use crate::{render, terminal, update};

/// Poll duration while background tasks may deliver results.
pub const FRAME_DURATION: Duration = Duration::from_millis(16);

/// Poll duration when nothing is running.
pub const IDLE_POLL_DURATION: Duration = Duration::from_millis(100);

/// Full-screen runtime for one OTP prompt.
///
/// Terminal state is restored and background tasks are cancelled on drop.
pub struct OtpRuntime {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    pub state: AppState,
    sms: SmsBridge,
    inbox_tx: UiEventSender,
    inbox_rx: UiEventReceiver,
    last_tick: Instant,
}

impl OtpRuntime {
    /// Creates a runtime and takes over the terminal.
    ///
    /// # Errors
    /// Returns an error if the terminal can't be set up.
    pub fn new(
        config: &Config,
        capabilities: Capabilities,
        code: Option<String>,
        sms: SmsBridge,
    ) -> Result<Self> {
        terminal::install_panic_hook();
        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;
        let state = AppState::new(config, capabilities, code);
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();

        Ok(Self {
            terminal,
            state,
            sms,
            inbox_tx,
            inbox_rx,
            last_tick: Instant::now(),
        })
    }

    /// Runs the prompt until it is submitted or dismissed.
    ///
    /// # Errors
    /// Returns an error if drawing or reading terminal input fails.
    pub fn run(&mut self) -> Result<Option<String>> {
        terminal::enable_input_features()?;

        let effects = update::mount(&mut self.state);
        self.execute_effects(effects);
        let result = self.event_loop();

        if !self.state.widget.is_disposed() {
            let effects = update::finish(&mut self.state, None);
            self.execute_effects(effects);
        }
        let _ = terminal::disable_input_features();

        result.map(|()| self.state.outcome.clone())
    }

    fn event_loop(&mut self) -> Result<()> {
        let mut dirty = true;

        while !self.state.should_quit {
            let mut events = self.collect_events()?;

            let size = self.terminal.size()?;
            events.insert(
                0,
                UiEvent::Frame {
                    width: size.width,
                    height: size.height,
                },
            );

            for event in events {
                if !matches!(&event, UiEvent::Frame { .. }) {
                    dirty = true;
                }
                let effects = update::update(&mut self.state, event);
                self.execute_effects(effects);
            }

            if dirty && !self.state.should_quit {
                self.terminal.draw(|frame| {
                    render::render(&self.state, frame);
                })?;
                dirty = false;
            }
        }

        Ok(())
    }

    // ========================================================================
    // Event Collection
    // ========================================================================

    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        let tick_interval = if self.state.tasks.is_any_running() {
            FRAME_DURATION
        } else {
            IDLE_POLL_DURATION
        };

        while let Ok(ev) = self.inbox_rx.try_recv() {
            events.push(ev);
        }

        let poll_duration = if events.is_empty() {
            tick_interval.saturating_sub(self.last_tick.elapsed())
        } else {
            Duration::ZERO
        };

        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            while event::poll(Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        if self.last_tick.elapsed() >= tick_interval {
            events.push(UiEvent::Tick);
            self.last_tick = Instant::now();
        }

        Ok(events)
    }

    // ========================================================================
    // Effect Dispatch
    // ========================================================================

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    fn dispatch_event(&mut self, event: UiEvent) {
        let effects = update::update(&mut self.state, event);
        if !effects.is_empty() {
            self.execute_effects(effects);
        }
    }

    /// Spawns a cancelable task with a uniform TaskStarted/TaskCompleted lifecycle.
    fn spawn_task<F, Fut>(&self, kind: TaskKind, f: F)
    where
        F: FnOnce(UiEventSender, CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        let cancel = CancellationToken::new();
        let _ = tx.send(UiEvent::TaskStarted {
            kind,
            cancel: cancel.clone(),
        });
        tokio::spawn(async move {
            f(tx.clone(), cancel.clone()).await;
            if !cancel.is_cancelled() {
                let _ = tx.send(UiEvent::TaskCompleted { kind });
            }
        });
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Quit => {
                self.state.should_quit = true;
            }
            UiEffect::Dispatch(event) => {
                // Runs after the effects queued before it have been applied.
                let _ = self.inbox_tx.send(UiEvent::Widget(event));
            }
            UiEffect::StartAutoFocus { delay } => {
                self.spawn_task(TaskKind::AutoFocus, move |tx, cancel| {
                    handlers::auto_focus(delay, tx, cancel)
                });
            }
            UiEffect::StartClipboardPoll { interval } => {
                self.spawn_task(TaskKind::ClipboardPoll, move |tx, cancel| {
                    handlers::clipboard_poll(SystemClipboard::open, interval, tx, cancel)
                });
            }
            UiEffect::StartSmsListener => self.start_sms_listener(),
            UiEffect::StopSmsListener => {
                self.sms.stop_listener();
            }
            UiEffect::CancelTask { kind, token } => {
                if let Some(cancel) = token {
                    debug!(?kind, "cancelling task");
                    cancel.cancel();
                }
            }
        }
    }

    fn start_sms_listener(&mut self) {
        match self.sms.get_hash() {
            Ok(hashes) => {
                self.dispatch_event(UiEvent::Widget(WidgetEvent::SmsHashesLoaded(hashes)));
            }
            Err(e) => warn!(error = %e, "failed to read app signature hashes"),
        }

        match self.sms.start_listener() {
            Ok(subscription) => {
                self.spawn_task(TaskKind::SmsListener, move |tx, cancel| {
                    handlers::forward_sms(subscription, tx, cancel)
                });
            }
            Err(e) => {
                warn!(error = %e, "failed to start SMS listener");
                self.dispatch_event(UiEvent::SmsListenerFailed {
                    error: e.to_string(),
                });
            }
        }
    }
}

impl Drop for OtpRuntime {
    fn drop(&mut self) {
        let sms_running = self.state.tasks.sms_listener.is_running();
        self.state.tasks.cancel_all();
        // Tasks whose start event was never drained.
        while let Ok(ev) = self.inbox_rx.try_recv() {
            if let UiEvent::TaskStarted { cancel, .. } = ev {
                cancel.cancel();
            }
        }
        if sms_running {
            self.sms.stop_listener();
        }
        let _ = terminal::restore_terminal();
    }
}
