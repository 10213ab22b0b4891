//! travelmap - world map travel tracker service.
//!
//! Wires a concrete visit store into the HTTP front end and serves it.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use travelmap::store::{MemoryStore, VisitStore};
use travelmap::{
    server, APP_NAME, APP_VERSION, HTTP_ADDR_DEFAULT, HTTP_REQUEST_TIMEOUT_SECS, TABLE_NAME_ENV,
};

// =============================================================================
// CLI
// =============================================================================

/// World map travel tracker
#[derive(Parser, Debug)]
#[command(name = APP_NAME)]
#[command(about = "World map travel tracker")]
#[command(version)]
struct Cli {
    /// Address to listen on
    #[arg(short, long, default_value = HTTP_ADDR_DEFAULT)]
    addr: String,

    /// Backing store for visit counts
    #[arg(long, value_enum, default_value_t = StoreKind::default())]
    store: StoreKind,

    /// DynamoDB table name (defaults to $TRAVELS_TABLE_NAME)
    #[cfg(feature = "dynamodb")]
    #[arg(long)]
    table: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StoreKind {
    /// In-memory map, lost on restart
    Memory,
    /// DynamoDB table
    #[cfg(feature = "dynamodb")]
    Dynamodb,
}

impl std::fmt::Display for StoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Memory => f.write_str("memory"),
            #[cfg(feature = "dynamodb")]
            Self::Dynamodb => f.write_str("dynamodb"),
        }
    }
}

impl Default for StoreKind {
    fn default() -> Self {
        #[cfg(feature = "dynamodb")]
        {
            Self::Dynamodb
        }
        #[cfg(not(feature = "dynamodb"))]
        {
            Self::Memory
        }
    }
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Initialize logging
    let filter = match cli.verbose {
        0 => "info,tower_http=debug",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .init();

    tracing::info!("{APP_NAME} v{APP_VERSION}");

    let store: Arc<dyn VisitStore> = match cli.store {
        StoreKind::Memory => Arc::new(MemoryStore::new()),
        #[cfg(feature = "dynamodb")]
        StoreKind::Dynamodb => {
            let table = cli
                .table
                .clone()
                .or_else(|| std::env::var(TABLE_NAME_ENV).ok())
                .filter(|table| !table.is_empty())
                .with_context(|| {
                    format!("no DynamoDB table configured; set {TABLE_NAME_ENV} or pass --table")
                })?;
            Arc::new(travelmap::store::DynamoStore::new(table).await)
        }
    };

    let app = server::router(store)?
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            HTTP_REQUEST_TIMEOUT_SECS,
        )));

    tracing::info!("Listening on {}", cli.addr);
    let listener = tokio::net::TcpListener::bind(&cli.addr)
        .await
        .with_context(|| format!("bind {}", cli.addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
    tracing::info!("Received Ctrl+C, shutting down");
}
