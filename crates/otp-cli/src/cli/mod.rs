//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use otp_core::config;

mod commands;

/// The user closed the prompt without submitting a code.
#[derive(Debug, thiserror::Error)]
#[error("Prompt dismissed")]
pub struct Dismissed;

#[derive(Parser)]
#[command(name = "otp")]
#[command(version)]
#[command(about = "Segmented one-time-passcode input")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Show the OTP prompt and print the entered code
    Input(InputArgs),

    /// Compute the SMS retriever app hash for a package
    Hash {
        /// Application package name
        #[arg(long)]
        package: String,

        /// Signing certificate(s), hex encoded
        #[arg(value_name = "SIGNATURE", required = true)]
        signatures: Vec<String>,
    },

    /// Work with SMS messages
    Sms {
        #[command(subcommand)]
        command: SmsCommands,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Overrides applied on top of the config file.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Number of digit fields
    #[arg(long, value_name = "N")]
    pub pin_count: Option<usize>,

    /// Paste-tolerant entry and clipboard detection
    #[arg(long)]
    pub auto_fill: bool,

    /// Mask entered digits
    #[arg(long)]
    pub secure: bool,

    /// Character shown in empty fields
    #[arg(long, value_name = "CHAR")]
    pub placeholder: Option<String>,

    /// Start with this code and mirror every edit into it
    #[arg(long)]
    pub code: Option<String>,

    /// Don't focus a field after the prompt opens
    #[arg(long)]
    pub no_autofocus: bool,

    /// Deliver this message through an in-process SMS retriever
    #[arg(long, value_name = "TEXT")]
    pub simulate_sms: Option<String>,
}

#[derive(clap::Subcommand)]
enum SmsCommands {
    /// Print the first N-digit code found in a message
    Extract {
        /// Code length
        #[arg(long, default_value_t = config::WidgetConfig::DEFAULT_PIN_COUNT)]
        digits: usize,

        /// Message text (read from stdin if omitted)
        #[arg(value_name = "MESSAGE")]
        message: Option<String>,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = match &cli.command {
        Commands::Input(_) => Some(crate::logging::init_file(&config::paths::logs_dir())?),
        _ => {
            crate::logging::init_stderr();
            None
        }
    };

    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Input(args) => {
            let config = config::Config::load().context("load config")?;
            commands::input::run(config, args).await
        }
        Commands::Hash {
            package,
            signatures,
        } => {
            commands::hash::run(&package, &signatures);
            Ok(())
        }
        Commands::Sms { command } => match command {
            SmsCommands::Extract { digits, message } => {
                commands::sms::extract(digits, message.as_deref())
            }
        },
        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        },
    }
}
