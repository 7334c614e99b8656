//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Quoter - Vehicle insurance premium quoting engine
#[derive(Parser)]
#[command(name = "quoter")]
#[command(about = "Vehicle insurance quoting engine", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Artifact directory (encoders, scaler, model, reference dataset)
    #[arg(long, default_value = "artifacts", global = true)]
    pub artifacts: PathBuf,

    /// Engine configuration file (TOML)
    ///
    /// When omitted, defaults apply and the reference year is taken
    /// from the current date.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory containing static files to serve (e.g., ui/dist)
        #[arg(long)]
        static_dir: Option<PathBuf>,

        /// Allowed CORS origin (repeatable; default is same-origin only)
        #[arg(long = "allow-origin")]
        allow_origins: Vec<String>,
    },

    /// Compute a quote for a profile given as JSON
    Quote {
        /// JSON file with the profile (reads stdin when omitted)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Pretty-print the quote JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Load and validate the artifact set, then print a summary
    Validate,
}
