//! SMS command handlers.

use std::io::Read;

use anyhow::{Context, Result};
use otp_core::sms::SmsInbox;

pub fn extract(digits: usize, message: Option<&str>) -> Result<()> {
    if digits == 0 {
        anyhow::bail!("--digits must be at least 1");
    }
    let message = match message {
        Some(message) => message.to_string(),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("read message from stdin")?;
            buf
        }
    };

    let mut inbox = SmsInbox::new(digits);
    match inbox.handle_message(message.trim_end_matches('\n')) {
        Some(code) => {
            println!("{code}");
            Ok(())
        }
        None if inbox.timeout_error => anyhow::bail!("SMS retriever timed out"),
        None => anyhow::bail!("No {digits}-digit code found in message"),
    }
}
