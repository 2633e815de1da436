//! Configuration for the OTP widget.
//!
//! Loads configuration from ${OTP_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::controller::EntryMode;

/// Returns the default config template with comments.
///
/// This is embedded from default_config.toml at compile time.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for configuration and log directories.
    //!
    //! OTP_HOME resolution order:
    //! 1. OTP_HOME environment variable (if set)
    //! 2. ~/.config/otp-input (default)

    use std::path::PathBuf;

    /// Returns the OTP home directory.
    ///
    /// Falls back to a relative `.otp-input` directory when no home directory
    /// can be determined.
    pub fn otp_home() -> PathBuf {
        if let Ok(home) = std::env::var("OTP_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".otp-input"),
            |h| h.join(".config").join("otp-input"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        otp_home().join("config.toml")
    }

    /// Returns the directory that receives log files.
    pub fn logs_dir() -> PathBuf {
        otp_home().join("logs")
    }
}

/// Widget behaviour flags (the configuration surface of one widget instance).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Number of digit fields.
    pub pin_count: usize,
    /// Focus a field shortly after mount.
    pub auto_focus_on_load: bool,
    /// Paste-tolerant reconciliation plus clipboard detection.
    pub auto_fill: bool,
    /// Mask entered digits.
    pub secure_text_entry: bool,
    /// Accept input events.
    pub editable: bool,
    /// Render every field empty; pressing the row clears the code.
    pub clear_inputs: bool,
    /// Render in the error style.
    pub error: bool,
    /// Character shown in empty fields.
    pub placeholder_character: String,
    /// Fill from incoming SMS when an SMS retriever is available.
    pub listen_sms: bool,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            pin_count: Self::DEFAULT_PIN_COUNT,
            auto_focus_on_load: true,
            auto_fill: false,
            secure_text_entry: false,
            editable: true,
            clear_inputs: false,
            error: false,
            placeholder_character: String::new(),
            listen_sms: false,
        }
    }
}

impl WidgetConfig {
    pub const DEFAULT_PIN_COUNT: usize = 6;

    pub fn entry_mode(&self) -> EntryMode {
        if self.auto_fill {
            EntryMode::AutoFill
        } else {
            EntryMode::Standard
        }
    }

    /// Checks invariants that serde defaults can't express.
    ///
    /// # Errors
    /// Returns an error if `pin_count` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.pin_count == 0 {
            anyhow::bail!("pin_count must be at least 1");
        }
        Ok(())
    }
}

/// Timer settings for deferred and periodic work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Clipboard poll interval in milliseconds.
    pub clipboard_poll_ms: u64,
    /// Delay before the initial focus, in milliseconds.
    pub auto_focus_delay_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            clipboard_poll_ms: 400,
            auto_focus_delay_ms: 300,
        }
    }
}

impl TimingConfig {
    pub fn clipboard_poll_interval(&self) -> Duration {
        Duration::from_millis(self.clipboard_poll_ms.max(1))
    }

    pub fn auto_focus_delay(&self) -> Duration {
        Duration::from_millis(self.auto_focus_delay_ms)
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub widget: WidgetConfig,
    pub timing: TimingConfig,
}

impl Config {
    /// Loads configuration from the default config path.
    ///
    /// # Errors
    /// Returns an error if the file exists but can't be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file can't be read, parsed, or validated.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str::<Config>(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))?
        } else {
            Config::default()
        };
        config
            .widget
            .validate()
            .with_context(|| format!("Invalid config at {}", path.display()))?;
        Ok(config)
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    ///
    /// # Errors
    /// Returns an error if the file exists or can't be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(path, default_config_template())
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }
}
