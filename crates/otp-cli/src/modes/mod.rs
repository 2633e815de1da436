//! Runtime execution modes.
//!
//! - `tui`: full-screen OTP prompt (optional feature)

#[cfg(feature = "tui")]
pub use otp_tui::{PromptOptions, run_otp_prompt};

#[cfg(not(feature = "tui"))]
pub struct PromptOptions {
    pub config: otp_core::config::Config,
    pub capabilities: otp_core::Capabilities,
    pub code: Option<String>,
    pub sms: otp_core::sms::SmsBridge,
}

#[cfg(not(feature = "tui"))]
pub async fn run_otp_prompt(_options: PromptOptions) -> anyhow::Result<Option<String>> {
    anyhow::bail!("TUI support is disabled in this build (feature \"tui\").");
}
