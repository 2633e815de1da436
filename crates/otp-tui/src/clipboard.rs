//! System clipboard access via `arboard`.

use otp_core::PlatformError;
use otp_core::clipboard::ClipboardSource;

/// Read access to the system clipboard.
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl SystemClipboard {
    /// Opens the system clipboard.
    ///
    /// # Errors
    /// Returns an error if no clipboard is available (e.g. headless session).
    pub fn open() -> Result<Self, PlatformError> {
        let inner = arboard::Clipboard::new().map_err(|e| PlatformError::Clipboard(e.to_string()))?;
        Ok(Self { inner })
    }
}

impl ClipboardSource for SystemClipboard {
    fn read_text(&mut self) -> Result<String, PlatformError> {
        self.inner
            .get_text()
            .map_err(|e| PlatformError::Clipboard(e.to_string()))
    }
}
