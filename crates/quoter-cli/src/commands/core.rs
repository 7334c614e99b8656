//! Shared command utilities

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Datelike;

use quoter_core::{EngineConfig, QuoteEngine};

/// Resolve the engine configuration: a TOML file when given, otherwise
/// defaults with the reference year taken from the current date.
pub fn resolve_config(config_path: Option<&Path>) -> Result<EngineConfig> {
    match config_path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => {
            let year = chrono::Utc::now().year();
            tracing::debug!("No config file given, defaulting reference year to {}", year);
            Ok(EngineConfig::for_year(year))
        }
    }
}

/// Load the engine from the artifact directory.
pub fn load_engine(artifacts: &Path, config_path: Option<&Path>) -> Result<QuoteEngine> {
    let config = resolve_config(config_path)?;
    tracing::debug!("Loading artifacts from {}", artifacts.display());
    QuoteEngine::load(artifacts, config)
        .with_context(|| format!("Failed to load artifacts from {}", artifacts.display()))
}
