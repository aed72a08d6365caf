//! Main entry point for the ZLET registration CLI.

use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use shared::config::ClientConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

mod commands;

use commands::program::{AfternoonAction, MorningAction, TrailAction};

/// ZLET CLI
#[derive(Parser)]
#[command(name = "zlet")]
#[command(about = "Command-line client for ZLET camp registration", long_about = None)]
pub(crate) struct Cli {
    /// Base URL of the registration API
    #[arg(
        long,
        global = true,
        help = "Base URL of the registration API (e.g., https://prijave.zlet.si/api). Overrides the config file and ZLET_API_URL."
    )]
    server: Option<String>,

    /// Path to the configuration file (optional)
    #[arg(
        long,
        short,
        global = true,
        help = "Path to the configuration file (e.g., zlet.yaml, zlet.json or zlet.toml). If not provided, defaults will be used."
    )]
    config: Option<PathBuf>,

    /// Log level for diagnostics written to stderr
    #[arg(
        long,
        global = true,
        help = "Log level for diagnostics written to stderr (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Subcommands for the ZLET CLI
#[derive(Subcommand)]
enum Commands {
    /// Sign in and keep the session for later commands
    Login {
        /// Username to sign in with; prompted for when omitted
        #[arg(long, short)]
        username: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show the signed-in user
    Me,

    /// Bivouac trails (leaders)
    Trails {
        #[command(subcommand)]
        action: TrailAction,
    },

    /// Morning program (leaders)
    Morning {
        #[command(subcommand)]
        action: MorningAction,
    },

    /// Afternoon program
    Afternoon {
        #[command(subcommand)]
        action: AfternoonAction,
    },

    /// Afternoon applications of your group members (leaders)
    Roster {
        /// Program day to show (e.g., Pon); defaults to the first day with applications
        #[arg(long, short)]
        day: Option<String>,
    },

    /// Generate shell completion scripts for the CLI
    Completion {
        /// The shell type for which to generate the completion script
        #[arg(
            long,
            short,
            value_enum,
            help = "The shell type for which to generate the completion script (e.g., bash, zsh, fish, powershell)"
        )]
        shell: clap_complete::Shell,
    },

    /// Generate a configuration file
    Config {
        /// Format of the configuration file to generate (yaml, json or toml). Defaults to yaml.
        #[arg(
            long,
            short,
            help = "Format of the configuration file to generate (yaml, json or toml). Defaults to yaml."
        )]
        format: Option<String>,

        /// Where to write the file; defaults to zlet.<format> in the current directory
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

fn init_tracing(level: &str) {
    let default_level = level.parse::<LevelFilter>().unwrap_or(LevelFilter::INFO);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::builder()
            .with_default_directive(default_level.into())
            .from_env_lossy()
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();

    // Completion and config generation work without a valid configuration.
    match cli.command {
        Commands::Completion { shell } => {
            commands::completion::generate_completion(shell);
            return Ok(());
        }
        Commands::Config { format, output } => {
            let format = format.unwrap_or_else(|| "yaml".to_string());
            return commands::config::generate_config(&format, output.as_deref());
        }
        _ => {}
    }

    let config = ClientConfig::load_config(cli.config.as_deref(), cli.server.as_deref())?;
    init_tracing(cli.log_level.as_deref().unwrap_or(&config.log_level));
    let client = commands::session::client(&config);

    match cli.command {
        Commands::Login { username } => commands::session::login(&client, username).await,
        Commands::Logout => commands::session::logout(&client),
        Commands::Me => commands::session::me(&client).await,
        Commands::Trails { action } => commands::program::trails(&client, &config, action).await,
        Commands::Morning { action } => commands::program::morning(&client, &config, action).await,
        Commands::Afternoon { action } => {
            commands::program::afternoon(&client, &config, action).await
        }
        Commands::Roster { day } => commands::roster::show(&client, &config, day.as_deref()).await,
        Commands::Completion { .. } | Commands::Config { .. } => Ok(()),
    }
}
