use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use shared::config::{AppConfig, ConfigFormat};

/// Writes the default configuration in `format`.
///
/// `output` of `-` prints to stdout; no output writes `config.<format>` in the
/// working directory.
///
/// # Errors
/// Returns an error if serialization or writing the file fails.
pub fn generate_config(format: ConfigFormat, output: Option<&Path>) -> Result<()> {
    let serialized = AppConfig::with_defaults()
        .render(format)
        .context("failed to serialize configuration")?;

    if output == Some(Path::new("-")) {
        io::stdout().write_all(serialized.as_bytes())?;
        return Ok(());
    }

    let path = output.map_or_else(|| PathBuf::from(format!("config.{format}")), Path::to_path_buf);
    fs::write(&path, serialized)
        .with_context(|| format!("failed to write {}", path.display()))?;

    println!(
        "Configuration file '{}' generated successfully.",
        path.display()
    );
    Ok(())
}
