use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;
use rappy_config::Config;

/// Picked up from the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

fn read_config_file(path: &Path) -> anyhow::Result<Config> {
    tracing::info!("Loading config from {}", path.display());
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let reader = BufReader::new(file);
    let config = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(config)
}

/// File (explicit, then `config.json` if present, then defaults), then
/// environment overrides, then validation
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    load_config_with(path, |key| env::var(key).ok())
}

fn load_config_with(
    path: Option<&Path>,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Config> {
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            read_config_file(Path::new(DEFAULT_CONFIG_FILE))?
        }
        None => {
            tracing::info!("No config file, using built-in defaults");
            Config::default()
        }
    };

    config.apply_overrides(lookup);
    config.validate().context("Invalid configuration")?;
    Ok(config)
}
