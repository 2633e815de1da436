//! Platform boundary errors.
//!
//! These never reach the reconciliation logic: clipboard and SMS failures are
//! absorbed where they happen, and only strict operations surface `NotLinked`.

use thiserror::Error;

use crate::platform::Platform;

/// Message shown when the native SMS retriever binding is missing.
pub const LINKING_ERROR: &str = "The SMS retriever doesn't seem to be linked. Make sure:\n\
     - the host registered an SMS retriever implementation\n\
     - the application was rebuilt after enabling the integration\n";

/// Errors raised by platform collaborators (clipboard, SMS retriever).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    /// The native module backing the operation is not registered.
    #[error("{}", LINKING_ERROR)]
    NotLinked,

    /// The feature is not available on this platform.
    #[error("{feature} is not supported on {platform}")]
    Unsupported {
        feature: &'static str,
        platform: Platform,
    },

    /// Reading the clipboard failed.
    #[error("clipboard read failed: {0}")]
    Clipboard(String),

    /// The SMS retriever reported a failure.
    #[error("SMS retriever failed: {0}")]
    Sms(String),
}
