/* src/main.rs */

use std::process;

use anyhow::Context;
use clap::Parser;
use myip::server::{self, ServerConfig, TRACING_TARGET_SHUTDOWN, TRACING_TARGET_STARTUP};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Reports the caller's IP address as seen through proxies and CDNs.
#[derive(Debug, Parser)]
#[command(name = "myip", version, about)]
struct Cli {
    #[command(flatten)]
    server: ServerConfig,
}

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SHUTDOWN,
            error = ?error,
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing();
    tracing::info!(
        target: TRACING_TARGET_STARTUP,
        version = env!("CARGO_PKG_VERSION"),
        "starting myip"
    );

    cli.server.log();
    cli.server
        .validate()
        .context("invalid server configuration")?;

    // Build the range tables before accepting connections.
    myip::ranges::init();

    let app = server::router(cli.server.request_timeout());
    server::serve(app, &cli.server).await
}

/// Installs the fmt subscriber, filtered by `RUST_LOG` (default `info`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
