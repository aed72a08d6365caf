use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use shared::config::{ClientConfig, ConfigFormat};

/// Generates a configuration file in the specified format.
///
/// # Arguments
/// * `format` - The format of the configuration file ("yaml", "json" or "toml").
/// * `output` - Target path; `zlet.<format>` in the current directory when `None`.
///
/// # Errors
/// Returns an error if the format is unsupported or if writing the file fails.
pub fn generate_config(format: &str, output: Option<&Path>) -> Result<()> {
    let format = ConfigFormat::parse(format)?;
    let path = output.map_or_else(
        || PathBuf::from(format!("zlet.{}", format.extension())),
        Path::to_path_buf,
    );

    let serialized = ClientConfig::with_defaults().render(format)?;
    fs::write(&path, serialized)
        .with_context(|| format!("failed to write configuration to {}", path.display()))?;

    println!(
        "Configuration file '{}' generated successfully.",
        path.display()
    );
    Ok(())
}
