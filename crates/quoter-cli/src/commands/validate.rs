//! Artifact validation command

use std::path::Path;

use anyhow::Result;

use super::load_engine;

pub fn cmd_validate(artifacts: &Path, config_path: Option<&Path>) -> Result<()> {
    let engine = load_engine(artifacts, config_path)?;
    let meta = engine.metadata();

    println!("✅ Artifact set is consistent");
    println!("   Model: {}", meta.model_kind);
    println!("   Features: {}", meta.feature_count);
    for name in &meta.features {
        println!("     - {name}");
    }
    println!("   Reference rows: {}", meta.reference_rows);
    println!("   Reference year: {}", meta.reference_year);
    Ok(())
}
