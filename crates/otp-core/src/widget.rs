//! Widget lifecycle reducer.
//!
//! `OtpWidget` wraps an [`OtpController`] with everything that happens around
//! it: mounting, deferred focus, clipboard polling, SMS delivery, handle
//! commands and teardown. Hosts feed [`WidgetEvent`]s into
//! [`OtpWidget::update`] and execute the returned effects.

use tracing::debug;

use crate::clipboard::ClipboardGate;
use crate::config::{Config, TimingConfig, WidgetConfig};
use crate::controller::OtpController;
use crate::effects::OtpEffect;
use crate::error::PlatformError;
use crate::fields::FieldHandle;
use crate::platform::Capabilities;
use crate::sms::SmsInbox;

/// Imperative operations exposed to the widget's owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleCommand {
    SetValue(String),
    Clear,
    /// Focus a field; `None` applies the initial-focus policy.
    FocusField(Option<isize>),
    BlurAll,
}

/// Everything that can happen to a widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEvent {
    /// A field was rendered and can take focus.
    FieldMounted { index: usize, handle: FieldHandle },
    FieldUnmounted { index: usize },
    Mounted,
    Unmounted,
    /// Text entered into a field (a keystroke or a paste).
    Input { index: usize, text: String },
    Backspace { index: usize },
    /// The field row was pressed.
    Pressed,
    KeyboardHidden,
    /// The host reports that a field gained focus.
    HostFocused(usize),
    /// The host reports that a field lost focus.
    HostBlurred(usize),
    AutoFocusDue,
    ClipboardPolled(Result<String, PlatformError>),
    SmsReceived(String),
    SmsHashesLoaded(Vec<String>),
    /// The owner supplied a new controlled code.
    CodePropChanged(Option<String>),
    /// Deferred clear requested by `OtpEffect::ClearField`.
    ClearField(usize),
    Command(HandleCommand),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Created,
    Mounted,
    Disposed,
}

#[derive(Debug)]
pub struct OtpWidget {
    config: WidgetConfig,
    timing: TimingConfig,
    capabilities: Capabilities,
    controller: OtpController,
    lifecycle: Lifecycle,
    clipboard: ClipboardGate,
    sms: SmsInbox,
}

impl OtpWidget {
    pub fn new(config: &Config, capabilities: Capabilities, code: Option<String>) -> Self {
        let controller = OtpController::new(&config.widget, code);
        let pin_count = controller.pin_count();
        Self {
            config: config.widget.clone(),
            timing: config.timing.clone(),
            capabilities,
            controller,
            lifecycle: Lifecycle::Created,
            clipboard: ClipboardGate::new(pin_count),
            sms: SmsInbox::new(pin_count),
        }
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn controller(&self) -> &OtpController {
        &self.controller
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_disposed(&self) -> bool {
        self.lifecycle == Lifecycle::Disposed
    }

    /// SMS consumer state (last message, extracted code, timeout flag).
    pub fn sms(&self) -> &SmsInbox {
        &self.sms
    }

    pub fn update(&mut self, event: WidgetEvent) -> Vec<OtpEffect> {
        if self.is_disposed() {
            debug!(?event, "event after dispose ignored");
            return Vec::new();
        }

        match event {
            WidgetEvent::FieldMounted { index, handle } => {
                self.controller.fields_mut().attach(index, handle);
                Vec::new()
            }
            WidgetEvent::FieldUnmounted { index } => {
                self.controller.fields_mut().detach(index);
                Vec::new()
            }
            WidgetEvent::Mounted => self.handle_mounted(),
            WidgetEvent::Unmounted => self.handle_unmounted(),
            WidgetEvent::Input { index, text } => {
                if !self.config.editable {
                    return Vec::new();
                }
                self.controller.on_character_input(index, &text)
            }
            WidgetEvent::Backspace { index } => {
                if !self.config.editable {
                    return Vec::new();
                }
                self.handle_backspace(index)
            }
            WidgetEvent::Pressed => self.controller.container_pressed(self.config.clear_inputs),
            WidgetEvent::KeyboardHidden => self.controller.keyboard_hidden(),
            WidgetEvent::HostFocused(index) => vec![OtpEffect::FieldFocused(index)],
            WidgetEvent::HostBlurred(index) => vec![OtpEffect::FieldBlurred(index)],
            WidgetEvent::AutoFocusDue => {
                if self.lifecycle != Lifecycle::Mounted || !self.config.auto_focus_on_load {
                    return Vec::new();
                }
                self.controller.initial_focus()
            }
            WidgetEvent::ClipboardPolled(result) => self.handle_clipboard(result),
            WidgetEvent::SmsReceived(raw) => self.handle_sms(&raw),
            WidgetEvent::SmsHashesLoaded(hashes) => {
                self.sms.hashes = hashes;
                Vec::new()
            }
            WidgetEvent::CodePropChanged(code) => {
                self.controller.set_code_prop(code);
                Vec::new()
            }
            WidgetEvent::ClearField(index) => self.controller.clear_field(index),
            WidgetEvent::Command(command) => self.handle_command(command),
        }
    }

    fn handle_mounted(&mut self) -> Vec<OtpEffect> {
        if self.lifecycle == Lifecycle::Mounted {
            return Vec::new();
        }
        self.lifecycle = Lifecycle::Mounted;

        let mut effects = Vec::new();
        if self.config.auto_focus_on_load {
            effects.push(OtpEffect::ScheduleAutoFocus {
                delay: self.timing.auto_focus_delay(),
            });
        }
        if self.config.auto_fill && self.capabilities.clipboard_autofill {
            effects.push(OtpEffect::StartClipboardPoll {
                interval: self.timing.clipboard_poll_interval(),
            });
        }
        if self.config.listen_sms && self.capabilities.sms_retriever {
            self.sms.reset();
            effects.push(OtpEffect::StartSmsListener);
        }
        effects
    }

    fn handle_unmounted(&mut self) -> Vec<OtpEffect> {
        let mut effects = vec![OtpEffect::CancelAutoFocus];
        if self.config.auto_fill && self.capabilities.clipboard_autofill {
            effects.push(OtpEffect::StopClipboardPoll);
        }
        if self.config.listen_sms && self.capabilities.sms_retriever {
            effects.push(OtpEffect::StopSmsListener);
        }
        self.controller.fields_mut().detach_all();
        self.lifecycle = Lifecycle::Disposed;
        effects
    }

    /// A backspace key press is followed by the field's own edit: a field that
    /// still holds a value after the key handler gets cleared as text input.
    fn handle_backspace(&mut self, index: usize) -> Vec<OtpEffect> {
        let had_value = self.controller.has_value(index);
        let mut effects = self.controller.on_backspace_at_empty_field(index);
        if had_value && self.controller.has_value(index) {
            effects.extend(self.controller.on_character_input(index, ""));
        }
        effects
    }

    fn handle_clipboard(&mut self, result: Result<String, PlatformError>) -> Vec<OtpEffect> {
        if !self.config.auto_fill {
            return Vec::new();
        }
        let text = match result {
            Ok(text) => text,
            Err(e) => {
                debug!(error = %e, "clipboard read failed");
                return Vec::new();
            }
        };
        match self.clipboard.observe(&text) {
            Some(code) => {
                debug!("clipboard code accepted");
                self.controller.on_character_input(0, &code)
            }
            None => Vec::new(),
        }
    }

    fn handle_sms(&mut self, raw: &str) -> Vec<OtpEffect> {
        match self.sms.handle_message(raw) {
            Some(code) => {
                debug!("SMS code extracted");
                self.controller.on_character_input(0, &code)
            }
            None => Vec::new(),
        }
    }

    fn handle_command(&mut self, command: HandleCommand) -> Vec<OtpEffect> {
        match command {
            HandleCommand::SetValue(code) => self.controller.set_value(&code),
            HandleCommand::Clear => self.controller.clear(),
            HandleCommand::FocusField(Some(index)) => self.controller.focus_field(index),
            HandleCommand::FocusField(None) => self.controller.initial_focus(),
            HandleCommand::BlurAll => self.controller.blur_all_fields(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::controller::test_support::filled_events;

    fn widget(config: WidgetConfig, capabilities: Capabilities, code: Option<&str>) -> OtpWidget {
        let config = Config {
            widget: config,
            timing: TimingConfig::default(),
        };
        let mut widget = OtpWidget::new(&config, capabilities, code.map(str::to_string));
        for index in 0..widget.controller().pin_count() {
            widget.update(WidgetEvent::FieldMounted {
                index,
                handle: FieldHandle(index as u64),
            });
        }
        widget
    }

    fn auto_fill_config() -> WidgetConfig {
        WidgetConfig {
            auto_fill: true,
            ..WidgetConfig::default()
        }
    }

    fn android() -> Capabilities {
        Capabilities {
            clipboard_autofill: true,
            sms_retriever: true,
        }
    }

    fn input(index: usize, text: &str) -> WidgetEvent {
        WidgetEvent::Input {
            index,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_mount_schedules_timers_per_config() {
        let mut w = widget(
            WidgetConfig {
                listen_sms: true,
                ..auto_fill_config()
            },
            android(),
            None,
        );
        let effects = w.update(WidgetEvent::Mounted);
        assert_eq!(
            effects,
            vec![
                OtpEffect::ScheduleAutoFocus {
                    delay: Duration::from_millis(300)
                },
                OtpEffect::StartClipboardPoll {
                    interval: Duration::from_millis(400)
                },
                OtpEffect::StartSmsListener,
            ]
        );
        assert_eq!(w.lifecycle(), Lifecycle::Mounted);
    }

    #[test]
    fn test_mount_without_capabilities_starts_nothing_external() {
        let mut w = widget(
            WidgetConfig {
                listen_sms: true,
                auto_focus_on_load: false,
                ..auto_fill_config()
            },
            Capabilities::default(),
            None,
        );
        assert!(w.update(WidgetEvent::Mounted).is_empty());
    }

    #[test]
    fn test_auto_focus_due_applies_initial_focus() {
        let mut w = widget(WidgetConfig::default(), Capabilities::default(), Some("123"));
        w.update(WidgetEvent::Mounted);
        let effects = w.update(WidgetEvent::AutoFocusDue);
        assert_eq!(effects, vec![OtpEffect::FocusField(2)]);
        assert_eq!(w.controller().selected_index(), Some(2));
    }

    #[test]
    fn test_auto_fill_paste_strips_and_fills_once() {
        let mut w = widget(auto_fill_config(), android(), None);
        w.update(WidgetEvent::Mounted);
        let effects = w.update(input(3, "12ab3456"));
        assert_eq!(w.controller().code(), "123456");
        assert_eq!(filled_events(&effects), vec!["123456"]);
        assert!(effects.contains(&OtpEffect::BlurField(0)));
        assert_eq!(w.controller().selected_index(), None);
    }

    #[test]
    fn test_clipboard_gating() {
        let mut w = widget(auto_fill_config(), android(), None);
        w.update(WidgetEvent::Mounted);

        let first = w.update(WidgetEvent::ClipboardPolled(Ok("123456".to_string())));
        assert!(first.is_empty());
        let same = w.update(WidgetEvent::ClipboardPolled(Ok("123456".to_string())));
        assert!(same.is_empty());
        assert_eq!(w.controller().code(), "");

        let changed = w.update(WidgetEvent::ClipboardPolled(Ok("654321".to_string())));
        assert_eq!(w.controller().code(), "654321");
        assert_eq!(filled_events(&changed), vec!["654321"]);
    }

    #[test]
    fn test_clipboard_errors_are_swallowed() {
        let mut w = widget(auto_fill_config(), android(), None);
        w.update(WidgetEvent::Mounted);
        let effects = w.update(WidgetEvent::ClipboardPolled(Err(PlatformError::Clipboard(
            "busy".to_string(),
        ))));
        assert!(effects.is_empty());

        // The failed read didn't count as the baseline.
        assert!(w
            .update(WidgetEvent::ClipboardPolled(Ok("111111".to_string())))
            .is_empty());
        assert!(!w
            .update(WidgetEvent::ClipboardPolled(Ok("222222".to_string())))
            .is_empty());
    }

    #[test]
    fn test_clipboard_ignored_in_standard_mode() {
        let mut w = widget(WidgetConfig::default(), android(), None);
        w.update(WidgetEvent::Mounted);
        w.update(WidgetEvent::ClipboardPolled(Ok("123456".to_string())));
        w.update(WidgetEvent::ClipboardPolled(Ok("654321".to_string())));
        assert_eq!(w.controller().code(), "");
    }

    #[test]
    fn test_controlled_code_mirrors_and_blocks_clear() {
        let mut w = widget(WidgetConfig::default(), Capabilities::default(), Some("12"));
        w.update(WidgetEvent::Mounted);
        w.update(WidgetEvent::CodePropChanged(Some("9876".to_string())));
        assert_eq!(w.controller().code(), "9876");

        let effects = w.update(WidgetEvent::Command(HandleCommand::Clear));
        assert!(effects.is_empty());
        assert_eq!(w.controller().code(), "9876");

        w.update(WidgetEvent::CodePropChanged(Some(String::new())));
        w.update(WidgetEvent::Command(HandleCommand::Clear));
        assert_eq!(w.controller().code(), "");
    }

    #[test]
    fn test_teardown_ignores_late_callbacks() {
        let mut w = widget(
            WidgetConfig {
                listen_sms: true,
                ..auto_fill_config()
            },
            android(),
            None,
        );
        w.update(WidgetEvent::Mounted);
        w.update(WidgetEvent::ClipboardPolled(Ok("000000".to_string())));

        let teardown = w.update(WidgetEvent::Unmounted);
        assert_eq!(
            teardown,
            vec![
                OtpEffect::CancelAutoFocus,
                OtpEffect::StopClipboardPoll,
                OtpEffect::StopSmsListener,
            ]
        );
        assert!(w.is_disposed());

        assert!(w.update(WidgetEvent::AutoFocusDue).is_empty());
        assert!(w
            .update(WidgetEvent::ClipboardPolled(Ok("654321".to_string())))
            .is_empty());
        assert!(w
            .update(WidgetEvent::SmsReceived("<#> 123456".to_string()))
            .is_empty());
        assert!(w.update(input(0, "1")).is_empty());
        assert_eq!(w.controller().code(), "");
        assert_eq!(w.controller().selected_index(), None);
    }

    #[test]
    fn test_sms_message_fills_code() {
        let mut w = widget(
            WidgetConfig {
                pin_count: 4,
                listen_sms: true,
                ..auto_fill_config()
            },
            android(),
            None,
        );
        w.update(WidgetEvent::Mounted);
        let effects = w.update(WidgetEvent::SmsReceived(
            "<#> Your code is 4821 FA+9qCX9VSu".to_string(),
        ));
        assert_eq!(w.controller().code(), "4821");
        assert_eq!(filled_events(&effects), vec!["4821"]);
        assert_eq!(w.sms().otp.as_deref(), Some("4821"));
    }

    #[test]
    fn test_sms_timeout_leaves_code_alone() {
        let mut w = widget(auto_fill_config(), android(), None);
        w.update(WidgetEvent::Mounted);
        assert!(w
            .update(WidgetEvent::SmsReceived("Timeout Error.".to_string()))
            .is_empty());
        assert!(w.sms().timeout_error);
    }

    #[test]
    fn test_read_only_widget_drops_input() {
        let mut w = widget(
            WidgetConfig {
                editable: false,
                ..WidgetConfig::default()
            },
            Capabilities::default(),
            None,
        );
        assert!(w.update(input(0, "1")).is_empty());
        assert!(w.update(WidgetEvent::Backspace { index: 0 }).is_empty());
        assert_eq!(w.controller().code(), "");
    }

    #[test]
    fn test_standard_backspace_on_filled_field_removes_last_digit() {
        let mut w = widget(WidgetConfig::default(), Capabilities::default(), None);
        w.update(input(0, "1"));
        w.update(input(1, "2"));
        w.update(WidgetEvent::Backspace { index: 1 });
        assert_eq!(w.controller().code(), "1");
    }

    #[test]
    fn test_auto_fill_backspace_runs_in_two_steps() {
        let mut w = widget(auto_fill_config(), android(), None);
        w.update(input(0, "1"));
        w.update(input(1, "2"));
        w.update(input(2, "3"));

        let effects = w.update(WidgetEvent::Backspace { index: 2 });
        assert_eq!(w.controller().code(), "12");
        assert!(effects.contains(&OtpEffect::FocusField(1)));
        assert_eq!(effects.last(), Some(&OtpEffect::ClearField(1)));

        w.update(WidgetEvent::ClearField(1));
        assert_eq!(w.controller().code(), "1");
    }

    #[test]
    fn test_host_focus_reports_are_forwarded() {
        let mut w = widget(WidgetConfig::default(), Capabilities::default(), None);
        assert_eq!(
            w.update(WidgetEvent::HostFocused(3)),
            vec![OtpEffect::FieldFocused(3)]
        );
        assert_eq!(
            w.update(WidgetEvent::HostBlurred(3)),
            vec![OtpEffect::FieldBlurred(3)]
        );
    }

    #[test]
    fn test_focus_command_without_index_uses_initial_policy() {
        let mut w = widget(auto_fill_config(), android(), Some("12"));
        let effects = w.update(WidgetEvent::Command(HandleCommand::FocusField(None)));
        assert_eq!(effects, vec![OtpEffect::FocusField(2)]);
    }
}
