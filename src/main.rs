//! fbauth - Firebase auth configuration linter
//!
//! Validates and prints authentication configuration files using the same
//! merge and validation rules applied at application start-up.

use clap::Parser;
use firebase_auth_config::cli::Cli;
use firebase_auth_config::Result;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Parse command-line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.debug);

    // Execute the command
    if let Err(e) = run(cli).await {
        error!("Error: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    info!("Starting fbauth");
    cli.execute().await
}

fn init_logging(debug: bool) {
    let default_filter = if debug {
        "firebase_auth_config=debug,fbauth=debug"
    } else {
        "firebase_auth_config=info,fbauth=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
