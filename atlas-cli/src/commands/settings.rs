use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};
use shared::{
    ApiError, AtlasClient, Settings,
    config::AppConfig,
    models::SettingsPatch,
};

use super::ConnectionArgs;

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    /// Print the settings currently stored by the backend
    Show(ShowArgs),
    /// Change one or more settings
    Save(SaveArgs),
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Print raw JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct SaveArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Maximum tokens per response (100-4000)
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Sampling temperature (0.0-1.0)
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Whether the assistant keeps conversation memory
    #[arg(long)]
    pub enable_memory: Option<bool>,

    /// Endpoint the assistant uses for model calls
    #[arg(long)]
    pub api_endpoint: Option<String>,

    /// Days of memory to retain (1-90)
    #[arg(long)]
    pub memory_retention: Option<u32>,
}

impl SaveArgs {
    fn patch(&self) -> SettingsPatch {
        SettingsPatch {
            model_temperature: self.temperature,
            max_tokens: self.max_tokens,
            enable_memory: self.enable_memory,
            api_endpoint: self.api_endpoint.clone(),
            memory_retention: self.memory_retention,
        }
    }
}

/// Runs `atlas settings show` or `atlas settings save`.
///
/// # Errors
/// Fails when configuration cannot be loaded, a requested value is out of
/// range, or the backend rejects or cannot be reached for the request.
pub async fn run(command: SettingsCommand) -> Result<()> {
    match command {
        SettingsCommand::Show(args) => show(args).await,
        SettingsCommand::Save(args) => save(args).await,
    }
}

/// Wraps a backend failure, telling the user when retrying may help.
fn backend_failure(err: ApiError, action: &str) -> anyhow::Error {
    let summary = if err.is_transient() {
        format!("failed to {action}; the backend may be temporarily unavailable, try again")
    } else {
        format!("failed to {action}")
    };
    anyhow::Error::new(err).context(summary)
}

fn client(config: &AppConfig) -> Result<AtlasClient> {
    AtlasClient::with_timeout(config.api_base_url.clone(), config.request_timeout())
        .context("failed to build HTTP client")
}

async fn show(args: ShowArgs) -> Result<()> {
    let config = args.connection.load()?;
    let settings = client(&config)?
        .fetch_settings()
        .await
        .map_err(|err| backend_failure(err, "fetch settings"))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&settings)?);
    } else {
        print!("{}", format_settings(&settings));
    }
    Ok(())
}

async fn save(args: SaveArgs) -> Result<()> {
    let patch = args.patch();
    if patch.is_empty() {
        bail!("nothing to save; pass at least one setting flag");
    }
    // Rejected values never reach the backend, not even the read below.
    patch.validate()?;

    let config = args.connection.load()?;
    let client = client(&config)?;
    let current = client
        .fetch_settings()
        .await
        .map_err(|err| backend_failure(err, "fetch current settings"))?;
    let merged = patch.apply(current);
    client
        .save_settings(&merged)
        .await
        .map_err(|err| backend_failure(err, "save settings"))?;

    println!("Settings saved.");
    print!("{}", format_settings(&merged));
    Ok(())
}

fn format_settings(settings: &Settings) -> String {
    format!(
        "Model temperature: {}\nMax tokens:        {}\nMemory enabled:    {}\nAPI endpoint:      {}\nMemory retention:  {} days\n",
        settings.model_temperature,
        settings.max_tokens,
        if settings.enable_memory { "yes" } else { "no" },
        settings.api_endpoint,
        settings.memory_retention,
    )
}
