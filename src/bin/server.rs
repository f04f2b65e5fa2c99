//! flatkv Server Binary
//!
//! Starts the HTTP server for flatkv.

use std::sync::Arc;

use clap::Parser;
use flatkv::{Config, MalformedRequestPolicy, Server, Store};
use tracing_subscriber::{fmt, EnvFilter};

/// flatkv Server
#[derive(Parser, Debug)]
#[command(name = "flatkv-server")]
#[command(about = "HTTP CRUD server over an in-memory key-value store")]
#[command(version)]
struct Args {
    /// Interface to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Maximum readiness events handled per wakeup
    #[arg(short, long, default_value = "64")]
    max_events: usize,

    /// Read chunk size in bytes
    #[arg(short, long, default_value = "4096")]
    read_chunk_size: usize,

    /// Answer unparseable requests with 400 instead of closing silently
    #[arg(long)]
    reject_malformed: bool,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,flatkv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    let policy = if args.reject_malformed {
        MalformedRequestPolicy::Reject
    } else {
        MalformedRequestPolicy::Drop
    };

    // Build config from args
    let config = Config::builder()
        .listen_addr(format!("{}:{}", args.host, args.port))
        .max_events(args.max_events)
        .read_chunk_size(args.read_chunk_size)
        .malformed_requests(policy)
        .build();

    tracing::info!("flatkv Server v{}", flatkv::VERSION);
    tracing::info!("Listen address: {}", config.listen_addr);

    let mut server = match Server::bind(config, Arc::new(Store::new())) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Failed to start server: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Available endpoints:");
    tracing::info!("  GET    /api/data       - Get all data");
    tracing::info!("  GET    /api/data/{{key}} - Get specific item");
    tracing::info!("  POST   /api/data       - Create new data (JSON body)");
    tracing::info!("  PUT    /api/data/{{key}} - Update item (JSON: {{\"value\": \"...\"}})");
    tracing::info!("  DELETE /api/data/{{key}} - Delete item");

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
