pub mod chat;
pub mod completion;
pub mod config;
pub mod logging;
pub mod settings;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use shared::config::AppConfig;
use url::Url;

/// Where to find configuration and the backend.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Path to a configuration file (yaml or json). Defaults to the user config file when present.
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Backend base URL, overriding configuration (e.g. http://localhost:8000)
    #[arg(long)]
    pub server: Option<Url>,
}

impl ConnectionArgs {
    /// Resolves configuration and installs logging.
    ///
    /// # Errors
    /// Fails when the configuration file or `ATLAS_*` variables are invalid.
    pub fn load(&self) -> Result<AppConfig> {
        let path = self
            .config
            .clone()
            .or_else(|| AppConfig::default_path().filter(|path| path.is_file()));
        let config = AppConfig::load_config(path.as_deref(), self.server.clone())
            .context("failed to load configuration")?;
        logging::init(&config.log_level);
        Ok(config)
    }
}
