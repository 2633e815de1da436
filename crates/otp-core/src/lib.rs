//! Core state machine for segmented one-time-passcode input.
//!
//! The crate is host-agnostic: it never touches a terminal, a clipboard or an
//! SMS service directly. Hosts feed [`widget::WidgetEvent`]s into
//! [`widget::OtpWidget::update`] and execute the returned
//! [`effects::OtpEffect`]s.
//!
//! ## Layers
//!
//! - `controller`: digits + focus reconciliation (standard and auto-fill policies)
//! - `widget`: lifecycle reducer (mount, timers, clipboard gate, SMS consumer)
//! - `clipboard`, `sms`, `signature`: collaborator boundaries
//! - `config`: TOML configuration with defaults

pub mod clipboard;
pub mod code;
pub mod config;
pub mod controller;
pub mod effects;
pub mod error;
pub mod fields;
pub mod platform;
pub mod signature;
pub mod sms;
pub mod widget;

pub use controller::{EntryMode, OtpController};
pub use effects::OtpEffect;
pub use error::PlatformError;
pub use platform::{Capabilities, Platform};
pub use widget::{HandleCommand, OtpWidget, WidgetEvent};
