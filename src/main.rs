//! Resilient request gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────────────┐
//!                        │                       GATEWAY                        │
//!   GET /api/v1/consul   │  ┌──────────┐    ┌──────────────┐    ┌────────────┐  │
//!   ─────────────────────┼─▶│   http   │───▶│ orchestrator │───▶│cache-aside │──┼──▶ Cache Store
//!                        │  │  server  │    └──────┬───────┘    └─────┬──────┘  │    (GET/SETEX)
//!                        │  └──────────┘           │                  │ miss    │
//!                        │                         │                  ▼         │
//!                        │                         │           ┌────────────┐   │
//!                        │                         │           │  circuit   │───┼──▶ Primary (B)
//!                        │                         │           │  breaker   │   │
//!                        │                         │           └─────┬──────┘   │
//!                        │                         │  failure / open │          │
//!                        │                         ▼                 │          │
//!                        │                  ┌──────────────┐◀────────┘          │
//!                        │                  │   fallback   │────────────────────┼──▶ Secondary (C)
//!                        │                  └──────────────┘                    │
//!                        │                                                      │
//!                        │  ┌────────────────────────────────────────────────┐  │
//!                        │  │ liveness monitor: PING every 10s, exit on loss │──┼──▶ Cache Store
//!                        │  └────────────────────────────────────────────────┘  │
//!                        └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use resilient_gateway::config::loader;
use resilient_gateway::lifecycle::startup;
use resilient_gateway::observability::init_logging;

#[derive(Parser)]
#[command(name = "resilient-gateway")]
#[command(about = "Cache-aside gateway with circuit breaker and fallback", long_about = None)]
struct Args {
    /// Optional TOML configuration file. Environment variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = loader::load(args.config.as_deref())?;

    init_logging(&config.observability)?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config_file = ?args.config,
        "resilient-gateway starting"
    );

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
