//! CLI argument definitions using clap
//!
//! Commands:
//! - embedgate serve [--config <path>]
//! - embedgate check-config [--config <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// embedgate - HTTP boundary layer for the embed-metadata service
#[derive(Parser, Debug)]
#[command(name = "embedgate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Path to JSON configuration file (defaults apply when omitted)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Load and validate configuration, print the effective values
    CheckConfig {
        /// Path to JSON configuration file (defaults apply when omitted)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
