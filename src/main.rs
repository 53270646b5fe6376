//! api-relay
//!
//! A server-side executor for declaratively described HTTP requests: a
//! request-building UI posts a spec to `/api/send`, the relay performs the
//! actual call on one of two long-lived transports, and answers with a
//! normalized description of whatever came back.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌────────────────────────────────────────────┐
//!                      │                 API RELAY                   │
//!                      │                                             │
//!   RequestSpec (JSON) │  ┌─────────┐   ┌───────────┐   ┌─────────┐ │
//!   ───────────────────┼─▶│  http   │──▶│ translate │──▶│transport│─┼──▶ Target
//!                      │  │ server  │   │ validate/ │   │ reqwest │ │    Server
//!                      │  └─────────┘   │   build   │   │ clients │ │
//!                      │                └───────────┘   └────┬────┘ │
//!                      │                                     │      │
//!   ResponseSpec (JSON)│  ┌─────────┐   ┌───────────┐        │      │
//!   ◀──────────────────┼──│  http   │◀──│ normalize │◀───────┘      │
//!                      │  │ server  │   │  flatten  │               │
//!                      │  └─────────┘   └───────────┘               │
//!                      │                                             │
//!                      │  config · observability · lifecycle         │
//!                      └────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_relay::config::{load_config, RelayConfig};
use api_relay::http::HttpServer;
use api_relay::lifecycle::Shutdown;
use api_relay::observability::metrics;

#[derive(Parser)]
#[command(name = "api-relay", version, about = "Relay server for declarative HTTP requests")]
struct Args {
    /// Path to a TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => RelayConfig::default(),
    };

    // Initialize tracing subscriber. RUST_LOG wins over the config level.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(format!(
                    "api_relay={},tower_http=info",
                    config.observability.log_level
                ))
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "api-relay starting");

    tracing::info!(
        bind_address = %config.listener.bind_address,
        default_timeout_ms = config.relay.default_timeout_ms,
        max_response_bytes = config.limits.max_response_bytes,
        "Configuration loaded"
    );

    // Initialize metrics exporter
    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    // Bind TCP listener
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        "Listening for connections"
    );

    // Ctrl+C triggers the graceful shutdown broadcast
    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received");
            shutdown.trigger();
        }
    });

    // Create and run HTTP server
    let server = HttpServer::new(config)?;
    server.run(listener, receiver).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
