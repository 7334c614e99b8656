//! Server command implementation

use std::path::Path;

use anyhow::Result;

use quoter_server::ServerConfig;

use super::load_engine;

pub async fn cmd_serve(
    artifacts: &Path,
    config_path: Option<&Path>,
    host: &str,
    port: u16,
    static_dir: Option<&Path>,
    allow_origins: Vec<String>,
) -> Result<()> {
    println!("🚀 Starting quoter web server...");
    println!("   Artifacts: {}", artifacts.display());
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }

    let engine = load_engine(artifacts, config_path)?;
    let meta = engine.metadata();
    println!(
        "   Model: {} ({} features, {} reference rows)",
        meta.model_kind, meta.feature_count, meta.reference_rows
    );

    let config = ServerConfig {
        allowed_origins: allow_origins,
    };
    let static_dir = static_dir.and_then(|p| p.to_str());
    quoter_server::serve(engine, host, port, static_dir, config).await
}
