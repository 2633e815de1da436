//! Clipboard polling gate.
//!
//! A polled clipboard value only becomes a fill candidate when it is a fresh,
//! complete code. The first poll only records a baseline so a code copied
//! before the widget appeared is never applied.

use tracing::debug;

use crate::code;
use crate::error::PlatformError;

/// Something that can read the current clipboard text.
pub trait ClipboardSource: Send {
    /// Reads the current clipboard text.
    ///
    /// # Errors
    /// Returns an error if the clipboard can't be read.
    fn read_text(&mut self) -> Result<String, PlatformError>;
}

/// Decides which polled clipboard values should fill the code.
#[derive(Debug, Clone)]
pub struct ClipboardGate {
    pin_count: usize,
    /// Last value read; `Some` once a baseline exists.
    last_seen: Option<String>,
}

impl ClipboardGate {
    pub fn new(pin_count: usize) -> Self {
        Self {
            pin_count,
            last_seen: None,
        }
    }

    pub fn has_baseline(&self) -> bool {
        self.last_seen.is_some()
    }

    /// Records a polled value and returns it if it should fill the code.
    pub fn observe(&mut self, text: &str) -> Option<String> {
        let accepted = match self.last_seen.as_deref() {
            None => {
                debug!("clipboard baseline recorded");
                false
            }
            Some(previous) => previous != text && code::is_complete_code(text, self.pin_count),
        };
        self.last_seen = Some(text.to_string());
        accepted.then(|| text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_poll_only_records_baseline() {
        let mut gate = ClipboardGate::new(6);
        assert!(!gate.has_baseline());
        assert_eq!(gate.observe("123456"), None);
        assert!(gate.has_baseline());
    }

    #[test]
    fn test_same_value_never_refills() {
        let mut gate = ClipboardGate::new(6);
        gate.observe("123456");
        assert_eq!(gate.observe("123456"), None);
        assert_eq!(gate.observe("654321"), Some("654321".to_string()));
        assert_eq!(gate.observe("654321"), None);
    }

    #[test]
    fn test_malformed_values_are_discarded() {
        let mut gate = ClipboardGate::new(6);
        gate.observe("");
        assert_eq!(gate.observe("12345"), None);
        assert_eq!(gate.observe("1234567"), None);
        assert_eq!(gate.observe("12 456"), None);
        assert_eq!(gate.observe("code: 123456"), None);
    }

    #[test]
    fn test_malformed_value_still_moves_last_seen() {
        let mut gate = ClipboardGate::new(4);
        gate.observe("1234");
        gate.observe("hello");
        assert_eq!(gate.observe("1234"), Some("1234".to_string()));
    }
}
