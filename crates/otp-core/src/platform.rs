//! Platform identity and injected capability flags.
//!
//! The controller never asks "which platform am I on"; hosts build a
//! [`Capabilities`] value once and hand it to the widget.

use std::fmt;

/// Host platform the widget is running on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Android,
    Ios,
    Desktop,
}

impl Platform {
    /// Platform of the current build target.
    pub fn current() -> Self {
        if cfg!(target_os = "android") {
            Platform::Android
        } else if cfg!(target_os = "ios") {
            Platform::Ios
        } else {
            Platform::Desktop
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Platform::Android => "Android",
            Platform::Ios => "iOS",
            Platform::Desktop => "desktop",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Features the host can provide to the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// Clipboard polling can detect codes copied by the user.
    pub clipboard_autofill: bool,
    /// An SMS retriever service can deliver incoming messages.
    pub sms_retriever: bool,
}

impl Capabilities {
    /// Default capabilities for a platform.
    ///
    /// iOS offers neither: it fills one-time codes through the keyboard.
    pub fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::Android => Self {
                clipboard_autofill: true,
                sms_retriever: true,
            },
            Platform::Ios => Self::default(),
            Platform::Desktop => Self {
                clipboard_autofill: true,
                sms_retriever: false,
            },
        }
    }

    #[must_use]
    pub fn with_sms_retriever(mut self, enabled: bool) -> Self {
        self.sms_retriever = enabled;
        self
    }
}
