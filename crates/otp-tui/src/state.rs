//! Application state for the OTP prompt.

use otp_core::config::Config;
use otp_core::{Capabilities, OtpWidget};
use ratatui::layout::Rect;

use crate::common::Tasks;

pub struct AppState {
    /// The widget being hosted.
    pub widget: OtpWidget,
    /// Field that currently holds the terminal cursor.
    pub focused: Option<usize>,
    /// The owner mirrors every code change back into the widget.
    pub controlled: bool,
    /// Terminal area from the last frame.
    pub area: Rect,
    /// Most recent completed code.
    pub filled: Option<String>,
    /// One-line message under the fields.
    pub status: Option<String>,
    pub tasks: Tasks,
    pub should_quit: bool,
    /// Submitted code, `None` when the prompt was dismissed.
    pub outcome: Option<String>,
}

impl AppState {
    pub fn new(config: &Config, capabilities: Capabilities, code: Option<String>) -> Self {
        let controlled = code.is_some();
        Self {
            widget: OtpWidget::new(config, capabilities, code),
            focused: None,
            controlled,
            area: Rect::default(),
            filled: None,
            status: None,
            tasks: Tasks::default(),
            should_quit: false,
            outcome: None,
        }
    }

    pub fn pin_count(&self) -> usize {
        self.widget.controller().pin_count()
    }

    pub fn is_complete(&self) -> bool {
        self.widget.controller().filled_count() >= self.pin_count()
    }
}
