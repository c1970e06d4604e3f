mod schema;

pub use schema::Config;

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Get the config directory path (~/.config/podium/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("podium"))
}

/// Get the default config file path (~/.config/podium/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path
///   (~/.config/podium/config.yaml), falling back to built-in defaults when
///   that file does not exist.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly requested config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                anyhow::bail!("Config file not found at {}", p.display());
            }
            p
        }
        None => match get_config_path() {
            Ok(p) if p.exists() => p,
            _ => {
                tracing::debug!("no config file, using defaults");
                return Ok(Config::default());
            }
        },
    };

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))?;

    tracing::debug!(path = %config_path.display(), "loaded config");
    Ok(config)
}
