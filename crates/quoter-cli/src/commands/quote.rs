//! One-shot quote command

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

use quoter_core::ProfileRequest;

use super::load_engine;

pub fn cmd_quote(
    artifacts: &Path,
    config_path: Option<&Path>,
    file: Option<&Path>,
    pretty: bool,
) -> Result<()> {
    let input = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            tracing::debug!("No profile file given, reading from stdin");
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read profile from stdin")?;
            buf
        }
    };
    let request: ProfileRequest =
        serde_json::from_str(&input).context("Profile is not valid JSON")?;

    let engine = load_engine(artifacts, config_path)?;
    let quote = match engine.compute_quote(&request) {
        Ok(quote) => quote,
        Err(err) if err.is_client_error() => {
            anyhow::bail!("Invalid profile: {err}");
        }
        Err(err) => return Err(err).context("Failed to compute quote"),
    };

    let output = if pretty {
        serde_json::to_string_pretty(&quote)?
    } else {
        serde_json::to_string(&quote)?
    };
    println!("{output}");
    Ok(())
}
