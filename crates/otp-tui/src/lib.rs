//! Terminal host for the OTP input widget.
//!
//! Renders one box per digit with ratatui, maps keys, pastes and clicks into
//! widget events, and runs the widget's timers, clipboard polling and SMS
//! forwarding as cancelable tokio tasks.

pub mod clipboard;
pub mod common;
pub mod effects;
pub mod events;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, stdout};

use anyhow::Result;
use otp_core::Capabilities;
use otp_core::config::Config;
use otp_core::sms::SmsBridge;
pub use runtime::OtpRuntime;

/// Everything needed to show one prompt.
pub struct PromptOptions {
    pub config: Config,
    pub capabilities: Capabilities,
    /// Controlled code; the prompt mirrors every edit back into it.
    pub code: Option<String>,
    pub sms: SmsBridge,
}

/// Shows the prompt and returns the submitted code.
///
/// Returns `Ok(None)` when the user dismisses the prompt.
///
/// # Errors
/// Returns an error if stdout is not a terminal or the terminal fails.
pub async fn run_otp_prompt(options: PromptOptions) -> Result<Option<String>> {
    if !stdout().is_terminal() {
        anyhow::bail!(
            "The OTP prompt requires a terminal.\n\
             Use `otp sms extract` for non-interactive use."
        );
    }

    let PromptOptions {
        config,
        capabilities,
        code,
        sms,
    } = options;
    let mut runtime = OtpRuntime::new(&config, capabilities, code, sms)?;
    runtime.run()
}
