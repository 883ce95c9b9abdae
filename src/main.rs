//! teleop-link binary
//!
//! Connects the control link and drives it from an interactive REPL standing
//! in for the joystick widget.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use teleop_link::config::AppConfig;
use teleop_link::link::{ConnectionState, LinkManager};
use teleop_link::session::TeleopSession;

/// Teleop Link - stream dual-stick control commands to a rover over WebSocket
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Override the rover WebSocket endpoint
    #[arg(short, long)]
    url: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_logging(&args.log_level)?;

    info!("Starting teleop-link...");

    let mut config = AppConfig::load(&args.config).await?;
    if let Some(url) = args.url {
        config.link.endpoint = url;
    }
    info!("Rover endpoint: {}", config.link.endpoint);

    let link = LinkManager::new(&config.link);
    link.subscribe_status(Arc::new(|state| match state {
        ConnectionState::Connected => info!("🔗 link connected"),
        ConnectionState::Connecting => info!("⏳ link connecting..."),
        ConnectionState::Disconnected => info!("🔌 link disconnected"),
    }));
    link.start();

    let session = TeleopSession::new(link.clone());
    teleop_link::cli::run_repl(&session).await?;

    info!("Shutting down...");
    link.stop().await;
    info!("teleop-link shutdown complete");

    Ok(())
}

fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
        .init();

    Ok(())
}
