//! Canopy admin gateway server.
//!
//! Serves the entity browse/count/delete API over a SQLite entity
//! database (or an empty in-memory store for scratch sessions).
//!
//! Usage:
//!   canopy-gateway --db entities.db --port 8080

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use canopy_gateway::{build_router, GatewayState};
use canopy_store::{EntityStore, MemoryStore, SqliteStore};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "canopy-gateway")]
#[command(about = "Admin gateway over a Canopy entity store")]
struct Args {
    /// Port for the HTTP API
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Path to the SQLite entity database
    #[arg(short, long, default_value = "entities.db")]
    db: PathBuf,

    /// Serve an empty in-memory store instead of opening --db
    #[arg(long)]
    memory: bool,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    let store: Arc<dyn EntityStore> = if args.memory {
        info!("Serving an in-memory store");
        Arc::new(MemoryStore::new())
    } else {
        info!("Opening entity database at {:?}", args.db);
        Arc::new(SqliteStore::open(&args.db).context("Failed to open entity database")?)
    };

    let app = build_router(GatewayState::new(store));
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", args.port))
        .await
        .context("Failed to bind HTTP port")?;
    info!("Canopy gateway listening on port {}", args.port);
    axum::serve(listener, app).await.context("HTTP server failed")?;
    Ok(())
}
