//! Command-line interface definition for Temporal Selves
//!
//! This module defines the CLI structure using clap's derive API. The only
//! operator-facing command is `serve`; everything else the service does is
//! driven over HTTP.

use clap::{Parser, Subcommand};

/// Temporal Selves - guided-reflection web service
///
/// Chat with your past and future selves, then answer a short set of
/// reflection questions.
#[derive(Parser, Debug, Clone)]
#[command(name = "temporal-selves")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override the listen address from config
    #[arg(long)]
    pub host: Option<String>,

    /// Override the listen port from config
    #[arg(long)]
    pub port: Option<u16>,

    /// Override the profile database path
    #[arg(long)]
    pub storage_path: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Temporal Selves
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the HTTP server
    Serve,
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve() {
        let cli = Cli::parse_from(["temporal-selves", "serve"]);
        assert!(matches!(cli.command, Commands::Serve));
        assert!(cli.config.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_parse_overrides() {
        let cli = Cli::parse_from([
            "temporal-selves",
            "--config",
            "custom.yaml",
            "--host",
            "0.0.0.0",
            "--port",
            "8080",
            "serve",
        ]);
        assert_eq!(cli.config.as_deref(), Some("custom.yaml"));
        assert_eq!(cli.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(cli.port, Some(8080));
    }
}
