//! Temporal Selves - guided-reflection web service
//!
#![doc = "Temporal Selves - guided-reflection web service"]
#![doc = "Main entry point for the Temporal Selves server."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use temporal_selves::cli::{Cli, Commands};
use temporal_selves::config::Config;
use temporal_selves::server::{self, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    init_tracing(cli.verbose);

    // If the user supplied a storage path on the CLI, mirror it into
    // TEMPORAL_SELVES_DB so the profile store initializer can pick it up.
    // This keeps callers unchanged while allowing `ProfileStore::new()` to
    // honor an override.
    if let Some(db_path) = &cli.storage_path {
        std::env::set_var("TEMPORAL_SELVES_DB", db_path);
        tracing::info!("Using storage DB override from CLI: {}", db_path);
    }

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration - fail fast on missing credentials
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Serve => {
            tracing::info!("Starting Temporal Selves server");
            let state = AppState::new(config)?;
            server::serve(state).await?;
            Ok(())
        }
    }
}

/// Initialize the tracing subscriber
///
/// Respects `RUST_LOG` when set; `--verbose` lowers the default level to
/// debug for this crate.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "temporal_selves=debug,tower_http=debug"
    } else {
        "temporal_selves=info"
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
