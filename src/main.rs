//! Path-prefix reverse proxy gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌───────────────────────────────────────────────┐
//!                         │                   GATEWAY                     │
//!   Client Request        │  ┌──────────┐    ┌──────────────┐             │
//!   ──────────────────────┼─▶│  http    │───▶│   routing    │             │
//!                         │  │  server  │    │  classify    │             │
//!                         │  └──────────┘    └──────┬───────┘             │
//!                         │          ┌──────────────┼──────────────┐      │
//!                         │          ▼              ▼              ▼      │
//!                         │    ┌──────────┐  ┌────────────┐  ┌──────────┐ │
//!                         │    │ built-in │  │   proxy    │  │  static  │ │
//!                         │    │ health/  │  │ strip path │  │ ServeDir │ │
//!                         │    │ version  │  │ + forward  │  │  or 404  │ │
//!                         │    └──────────┘  └─────┬──────┘  └──────────┘ │
//!                         │                        │                      │
//!                         └────────────────────────┼──────────────────────┘
//!                                                  ▼
//!                                           Upstream service
//! ```

use clap::Parser;
use std::path::PathBuf;

use gateway_proxy::lifecycle::{signals, startup, Shutdown};
use gateway_proxy::observability::logging;

#[derive(Parser)]
#[command(name = "gateway-proxy")]
#[command(about = "Path-prefix reverse proxy gateway with static file fallback", long_about = None)]
struct Cli {
    /// TOML configuration file. Without it, defaults plus environment are used.
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = startup::resolve_config(cli.config.as_deref())?;

    logging::init(&config.observability.log_level);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        routes = config.routes.len(),
        "gateway-proxy starting"
    );
    for route in &config.routes {
        tracing::info!(
            route = %route.name,
            gateway_path = %route.gateway_path,
            upstream = %route.upstream,
            "Route configured"
        );
    }

    let shutdown = Shutdown::new();
    let server = startup::run(config, shutdown.subscribe());
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => result?,
        _ = signals::wait_for_termination() => {
            shutdown.trigger();
            server.await?;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
