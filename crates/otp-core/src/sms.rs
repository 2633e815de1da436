//! SMS retriever boundary.
//!
//! The platform service delivers raw message text; `SmsInbox` is the consumer
//! that pulls the code out of it. The controller itself never parses SMS.
//!
//! ## Degradation
//!
//! - Unsupported platform: warn and return an inert default
//! - Missing retriever: strict operations fail with `PlatformError::NotLinked`
//! - `stop_listener` never fails

use std::sync::{Arc, Mutex};

use regex::Regex;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::PlatformError;
use crate::platform::Platform;
use crate::signature;

/// Payload delivered by the retriever when its wait window expires.
pub const TIMEOUT_MESSAGE: &str = "Timeout Error.";

/// Platform service that receives SMS addressed to this app.
pub trait SmsRetriever: Send {
    /// Hashes the sender must append to the SMS body.
    ///
    /// # Errors
    /// Returns an error if the hashes can't be computed.
    fn signature_hashes(&self) -> Result<Vec<String>, PlatformError>;

    /// Registers for incoming messages.
    ///
    /// # Errors
    /// Returns an error if the platform service is unavailable.
    fn start(&mut self) -> Result<SmsSubscription, PlatformError>;

    /// Unregisters. Calling it again is harmless.
    fn stop(&mut self);
}

/// Stream of raw messages from one registration.
#[derive(Debug)]
pub struct SmsSubscription {
    rx: Option<mpsc::UnboundedReceiver<String>>,
}

impl SmsSubscription {
    pub fn new(rx: mpsc::UnboundedReceiver<String>) -> Self {
        Self { rx: Some(rx) }
    }

    /// A subscription that never delivers anything.
    pub fn inert() -> Self {
        Self { rx: None }
    }

    pub fn is_inert(&self) -> bool {
        self.rx.is_none()
    }

    /// Waits for the next message; `None` once the retriever stopped.
    ///
    /// An inert subscription waits forever.
    pub async fn recv(&mut self) -> Option<String> {
        match &mut self.rx {
            Some(rx) => rx.recv().await,
            None => std::future::pending().await,
        }
    }
}

type SharedSender = Arc<Mutex<Option<mpsc::UnboundedSender<String>>>>;

/// In-process retriever fed through an [`SmsSender`].
#[derive(Debug)]
pub struct ChannelSmsRetriever {
    package_name: String,
    signatures: Vec<String>,
    active: SharedSender,
}

/// Delivers messages to the current `ChannelSmsRetriever` registration.
#[derive(Debug, Clone)]
pub struct SmsSender {
    active: SharedSender,
}

impl ChannelSmsRetriever {
    pub fn new(package_name: impl Into<String>, signatures: Vec<String>) -> (Self, SmsSender) {
        let active: SharedSender = Arc::new(Mutex::new(None));
        let retriever = Self {
            package_name: package_name.into(),
            signatures,
            active: Arc::clone(&active),
        };
        (retriever, SmsSender { active })
    }
}

impl SmsRetriever for ChannelSmsRetriever {
    fn signature_hashes(&self) -> Result<Vec<String>, PlatformError> {
        Ok(signature::app_signatures(
            &self.package_name,
            &self.signatures,
        ))
    }

    fn start(&mut self) -> Result<SmsSubscription, PlatformError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut active = self
            .active
            .lock()
            .map_err(|e| PlatformError::Sms(e.to_string()))?;
        *active = Some(tx);
        Ok(SmsSubscription::new(rx))
    }

    fn stop(&mut self) {
        if let Ok(mut active) = self.active.lock() {
            active.take();
        }
    }
}

impl SmsSender {
    /// Delivers `message` to the active registration.
    ///
    /// Returns false when nobody is listening.
    pub fn deliver(&self, message: impl Into<String>) -> bool {
        let Ok(active) = self.active.lock() else {
            return false;
        };
        active
            .as_ref()
            .is_some_and(|tx| tx.send(message.into()).is_ok())
    }
}

/// Capability-aware front for an optional SMS retriever.
pub struct SmsBridge {
    platform: Platform,
    supported: bool,
    retriever: Option<Box<dyn SmsRetriever>>,
}

impl std::fmt::Debug for SmsBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmsBridge")
            .field("platform", &self.platform)
            .field("supported", &self.supported)
            .field("linked", &self.retriever.is_some())
            .finish()
    }
}

impl SmsBridge {
    pub fn new(
        platform: Platform,
        supported: bool,
        retriever: Option<Box<dyn SmsRetriever>>,
    ) -> Self {
        Self {
            platform,
            supported,
            retriever,
        }
    }

    /// Bridge with no retriever on a platform without SMS support.
    pub fn unsupported(platform: Platform) -> Self {
        Self::new(platform, false, None)
    }

    fn unsupported_error(&self) -> PlatformError {
        PlatformError::Unsupported {
            feature: "SMS retriever",
            platform: self.platform,
        }
    }

    fn warn_unsupported(&self) {
        warn!("{}", self.unsupported_error());
    }

    /// Signature hashes; empty on unsupported platforms.
    ///
    /// # Errors
    /// Returns `NotLinked` if no retriever is registered on a supported platform.
    pub fn get_hash(&self) -> Result<Vec<String>, PlatformError> {
        if !self.supported {
            self.warn_unsupported();
            return Ok(Vec::new());
        }
        self.retriever
            .as_ref()
            .ok_or(PlatformError::NotLinked)?
            .signature_hashes()
    }

    /// Starts listening; inert subscription on unsupported platforms.
    ///
    /// # Errors
    /// Returns `NotLinked` if no retriever is registered, or the retriever's error.
    pub fn start_listener(&mut self) -> Result<SmsSubscription, PlatformError> {
        if !self.supported {
            self.warn_unsupported();
            return Ok(SmsSubscription::inert());
        }
        self.retriever
            .as_mut()
            .ok_or(PlatformError::NotLinked)?
            .start()
    }

    pub fn stop_listener(&mut self) {
        if !self.supported {
            self.warn_unsupported();
            return;
        }
        if let Some(retriever) = self.retriever.as_mut() {
            retriever.stop();
        }
    }
}

/// Returns the first run of `digits` ASCII digits in `message`.
pub fn extract_otp(message: &str, digits: usize) -> Option<String> {
    otp_pattern(digits)?
        .find(message)
        .map(|m| m.as_str().to_string())
}

fn otp_pattern(digits: usize) -> Option<Regex> {
    if digits == 0 {
        return None;
    }
    Regex::new(&format!("[0-9]{{{digits}}}")).ok()
}

/// Consumer state for incoming messages.
#[derive(Debug, Clone)]
pub struct SmsInbox {
    pattern: Option<Regex>,
    /// Last raw message received.
    pub message: Option<String>,
    /// Last code extracted from a message.
    pub otp: Option<String>,
    /// The retriever's wait window expired.
    pub timeout_error: bool,
    /// Signature hashes reported by the retriever.
    pub hashes: Vec<String>,
}

impl SmsInbox {
    pub fn new(digits: usize) -> Self {
        Self {
            pattern: otp_pattern(digits),
            message: None,
            otp: None,
            timeout_error: false,
            hashes: Vec::new(),
        }
    }

    /// Records a raw message and returns the extracted code, if any.
    pub fn handle_message(&mut self, raw: &str) -> Option<String> {
        if raw == TIMEOUT_MESSAGE {
            debug!("SMS retriever timed out");
            self.timeout_error = true;
            return None;
        }
        self.message = Some(raw.to_string());
        let otp = self
            .pattern
            .as_ref()?
            .find(raw)
            .map(|m| m.as_str().to_string());
        if otp.is_some() {
            self.otp.clone_from(&otp);
        }
        otp
    }

    /// Forgets the last message (listener restarted).
    pub fn reset(&mut self) {
        self.message = None;
        self.otp = None;
        self.timeout_error = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_otp_takes_first_run() {
        assert_eq!(
            extract_otp("<#> Your OTP is 123456 L1lD8GP/5Eo", 6),
            Some("123456".to_string())
        );
        assert_eq!(extract_otp("code 12345678", 6), Some("123456".to_string()));
        assert_eq!(extract_otp("code 1234", 6), None);
        assert_eq!(extract_otp("anything 123", 0), None);
    }

    #[test]
    fn test_extract_otp_ignores_non_ascii_digits() {
        assert_eq!(extract_otp("١٢٣٤٥٦", 6), None);
    }

    #[test]
    fn test_inbox_timeout_sets_flag() {
        let mut inbox = SmsInbox::new(6);
        assert_eq!(inbox.handle_message(TIMEOUT_MESSAGE), None);
        assert!(inbox.timeout_error);
        assert!(inbox.message.is_none());
    }

    #[test]
    fn test_inbox_records_message_and_code() {
        let mut inbox = SmsInbox::new(4);
        assert_eq!(
            inbox.handle_message("Your code: 4821"),
            Some("4821".to_string())
        );
        assert_eq!(inbox.message.as_deref(), Some("Your code: 4821"));
        assert_eq!(inbox.otp.as_deref(), Some("4821"));

        inbox.reset();
        assert!(inbox.otp.is_none());
    }

    #[test]
    fn test_unsupported_bridge_is_inert() {
        let mut bridge = SmsBridge::unsupported(Platform::Ios);
        assert_eq!(bridge.get_hash().unwrap(), Vec::<String>::new());
        assert!(bridge.start_listener().unwrap().is_inert());
        bridge.stop_listener();
    }

    #[test]
    fn test_unsupported_message_names_platform() {
        let bridge = SmsBridge::unsupported(Platform::Ios);
        assert_eq!(
            bridge.unsupported_error().to_string(),
            "SMS retriever is not supported on iOS"
        );
    }

    #[test]
    fn test_missing_retriever_is_not_linked() {
        let mut bridge = SmsBridge::new(Platform::Android, true, None);
        assert_eq!(bridge.get_hash(), Err(PlatformError::NotLinked));
        assert!(matches!(
            bridge.start_listener(),
            Err(PlatformError::NotLinked)
        ));
        bridge.stop_listener();
    }

    #[tokio::test]
    async fn test_channel_retriever_delivers_until_stopped() {
        let (retriever, sender) =
            ChannelSmsRetriever::new("com.example.app", vec!["3082abcd".to_string()]);
        let mut bridge = SmsBridge::new(Platform::Android, true, Some(Box::new(retriever)));

        assert_eq!(bridge.get_hash().unwrap(), vec!["7OS8/g6GQfB".to_string()]);
        assert!(!sender.deliver("too early"));

        let mut subscription = bridge.start_listener().unwrap();
        assert!(sender.deliver("<#> 123456"));
        assert_eq!(subscription.recv().await.as_deref(), Some("<#> 123456"));

        bridge.stop_listener();
        bridge.stop_listener();
        assert!(!sender.deliver("late"));
        assert_eq!(subscription.recv().await, None);
    }
}
