//! Quoter CLI - Vehicle insurance quoting engine
//!
//! Usage:
//!   quoter validate             Check the artifact set loads cleanly
//!   quoter quote --file p.json  Compute a quote for a profile
//!   quoter serve --port 3000    Start the web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Serve {
            port,
            host,
            static_dir,
            allow_origins,
        } => {
            commands::cmd_serve(
                &cli.artifacts,
                cli.config.as_deref(),
                &host,
                port,
                static_dir.as_deref(),
                allow_origins,
            )
            .await
        }
        Commands::Quote { file, pretty } => {
            commands::cmd_quote(&cli.artifacts, cli.config.as_deref(), file.as_deref(), pretty)
        }
        Commands::Validate => commands::cmd_validate(&cli.artifacts, cli.config.as_deref()),
    }
}
