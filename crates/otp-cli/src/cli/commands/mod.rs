//! CLI command handlers.

pub mod config;
pub mod hash;
pub mod input;
pub mod sms;
