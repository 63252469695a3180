//! Config command: prints a `flare.toml`

use crate::config::FlareConfig;
use anyhow::{Context, Result};
use std::path::Path;

/// Print the defaults, or the effective settings of `path` after validation
pub fn run(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(path) => {
            let config = FlareConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?;
            config.validate().context("Invalid configuration")?;
            config
        }
        None => FlareConfig::default(),
    };

    print!("{}", config.to_toml_string()?);
    Ok(())
}
