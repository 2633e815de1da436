//! `otp input`: run the prompt.

use std::time::Duration;

use anyhow::Result;
use otp_core::config::Config;
use otp_core::sms::{ChannelSmsRetriever, SmsBridge, SmsRetriever, SmsSender};
use otp_core::{Capabilities, Platform};
use tracing::{debug, info};

use crate::cli::{Dismissed, InputArgs};
use crate::modes::{self, PromptOptions};

/// How often a simulated message is retried until the listener registers.
const SIMULATED_SMS_RETRY: Duration = Duration::from_millis(100);
const SIMULATED_SMS_ATTEMPTS: u32 = 50;

pub async fn run(mut config: Config, args: InputArgs) -> Result<()> {
    apply_overrides(&mut config, &args)?;

    let platform = Platform::current();
    let mut capabilities = Capabilities::for_platform(platform);
    if args.simulate_sms.is_some() {
        capabilities = capabilities.with_sms_retriever(true);
    }

    let mut retriever: Option<Box<dyn SmsRetriever>> = None;
    if let Some(message) = args.simulate_sms.clone() {
        let (channel, sender) = ChannelSmsRetriever::new(env!("CARGO_PKG_NAME"), Vec::new());
        retriever = Some(Box::new(channel));
        tokio::spawn(deliver_when_listening(sender, message));
    }
    let sms = SmsBridge::new(platform, capabilities.sms_retriever, retriever);

    info!(pin_count = config.widget.pin_count, mode = ?config.widget.entry_mode(), "opening prompt");
    let outcome = modes::run_otp_prompt(PromptOptions {
        config,
        capabilities,
        code: args.code,
        sms,
    })
    .await?;

    match outcome {
        Some(code) => {
            println!("{code}");
            Ok(())
        }
        None => Err(Dismissed.into()),
    }
}

fn apply_overrides(config: &mut Config, args: &InputArgs) -> Result<()> {
    let widget = &mut config.widget;
    if let Some(pin_count) = args.pin_count {
        widget.pin_count = pin_count;
    }
    if args.auto_fill {
        widget.auto_fill = true;
    }
    if args.secure {
        widget.secure_text_entry = true;
    }
    if let Some(placeholder) = &args.placeholder {
        widget.placeholder_character.clone_from(placeholder);
    }
    if args.no_autofocus {
        widget.auto_focus_on_load = false;
    }
    if args.simulate_sms.is_some() {
        widget.listen_sms = true;
    }
    widget.validate()
}

async fn deliver_when_listening(sender: SmsSender, message: String) {
    for _ in 0..SIMULATED_SMS_ATTEMPTS {
        if sender.deliver(message.clone()) {
            debug!("simulated SMS delivered");
            return;
        }
        tokio::time::sleep(SIMULATED_SMS_RETRY).await;
    }
    debug!("simulated SMS dropped, listener never started");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply_on_top_of_config() {
        let mut config = Config::default();
        let args = InputArgs {
            pin_count: Some(4),
            auto_fill: true,
            secure: true,
            placeholder: Some("_".to_string()),
            no_autofocus: true,
            simulate_sms: Some("<#> 1234".to_string()),
            ..InputArgs::default()
        };
        apply_overrides(&mut config, &args).unwrap();

        assert_eq!(config.widget.pin_count, 4);
        assert!(config.widget.auto_fill);
        assert!(config.widget.secure_text_entry);
        assert_eq!(config.widget.placeholder_character, "_");
        assert!(!config.widget.auto_focus_on_load);
        assert!(config.widget.listen_sms);
    }

    #[test]
    fn test_zero_pin_count_override_is_rejected() {
        let mut config = Config::default();
        let args = InputArgs {
            pin_count: Some(0),
            ..InputArgs::default()
        };
        assert!(apply_overrides(&mut config, &args).is_err());
    }
}
