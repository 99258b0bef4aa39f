//! Main entry point for the Atlas command-line client.

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use dotenv::dotenv;
use shared::config::ConfigFormat;
use std::path::PathBuf;

mod commands;

use commands::{chat::ChatArgs, settings::SettingsCommand};

/// Atlas CLI
#[derive(Parser, Debug)]
#[command(name = "atlas", version)]
#[command(about = "Threaded chat and assistant settings from the terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Subcommands for the Atlas CLI
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start an interactive threaded chat session
    Chat(ChatArgs),

    /// Read or update the assistant settings stored by the backend
    #[command(subcommand)]
    Settings(SettingsCommand),

    /// Generate a configuration file
    Config {
        /// Format of the configuration file to generate (yaml or json)
        #[arg(long, short, default_value_t = ConfigFormat::Yaml)]
        format: ConfigFormat,

        /// Where to write the file; `-` prints to stdout. Defaults to `config.<format>`.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Generate shell completion scripts for the CLI
    Completion {
        /// The shell type for which to generate the completion script
        #[arg(long, short, value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Chat(args) => commands::chat::run(args).await?,
        Commands::Settings(command) => commands::settings::run(command).await?,
        Commands::Config { format, output } => {
            commands::config::generate_config(format, output.as_deref())?;
        }
        Commands::Completion { shell } => commands::completion::generate_completion(shell),
    }

    Ok(())
}
