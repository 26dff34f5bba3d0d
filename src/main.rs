//! Role servant (v1)
//!
//! Hosts one example servant over HTTP.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────────┐
//!                      │                  ROLE SERVANT                     │
//!                      │                                                   │
//!     Client Request   │  ┌─────────┐    ┌───────────┐   ┌──────────────┐  │
//!     ─────────────────┼─▶│  http   │───▶│ discovery │──▶│   protocol   │  │
//!                      │  │ server  │    │   path?   │   │   reporter   │  │
//!                      │  └─────────┘    └─────┬─────┘   └──────────────┘  │
//!                      │                       │ no                        │
//!                      │                       ▼                           │
//!                      │                ┌──────────────┐  ┌────────────┐   │
//!                      │                │   dispatch   │─▶│  registry  │   │
//!                      │                │    engine    │  │ (matchers) │   │
//!                      │                └──────┬───────┘  └────────────┘   │
//!                      │                       ▼                           │
//!     Client Response  │                ┌──────────────┐                   │
//!     ◀────────────────┼────────────────│   handler    │                   │
//!                      │                └──────────────┘                   │
//!                      └──────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use role_servant::config::{load_config, ServantConfig};
use role_servant::lifecycle::{shutdown_signal, Shutdown};
use role_servant::observability::{init_logging, init_metrics};
use role_servant::servants::{build_registry, ServantKind};
use role_servant::HttpServer;

#[derive(Parser)]
#[command(name = "role-servant")]
#[command(about = "Serve an example servant and its role protocol", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// The port the servant should listen on.
    #[arg(short, long)]
    port: Option<u16>,

    /// Which servant to host.
    #[arg(short, long, value_enum, default_value_t = ServantKind::Echo)]
    servant: ServantKind,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServantConfig::default(),
    };

    if let Some(port) = args.port {
        let mut addr: SocketAddr = config.listener.bind_address.parse()?;
        addr.set_port(port);
        config.listener.bind_address = addr.to_string();
    }

    init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), servant = ?args.servant, "role-servant starting");

    tracing::info!(
        bind_address = %config.listener.bind_address,
        protocol_path = %config.role.protocol_path,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let registry = build_registry(args.servant, config.role.literal_mode()).map_err(|e| {
        tracing::error!(error = %e, "Handler registration failed");
        e
    })?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(shutdown.trigger_after(shutdown_signal()));

    let server = HttpServer::new(config, registry)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
