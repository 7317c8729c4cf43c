//! TabulaDB Server Binary
//!
//! Starts the TCP server for TabulaDB.

use std::sync::Arc;

use clap::Parser;
use tabuladb::network::Server;
use tabuladb::{Config, Database};
use tracing_subscriber::{fmt, EnvFilter};

/// TabulaDB Server
#[derive(Parser, Debug)]
#[command(name = "tabuladb-server")]
#[command(about = "Minimal table store speaking line-oriented commands over TCP")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./tabuladb_data")]
    data_dir: String,

    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:12345")]
    listen: String,

    /// Verbose diagnostic logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    // Initialize tracing/logging; --verbose lowers the default filter
    let default_filter = if args.verbose {
        "debug,tabuladb=trace"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    tracing::info!("TabulaDB Server v{}", tabuladb::VERSION);
    tracing::info!("Data directory: {}", args.data_dir);
    tracing::info!("Listen address: {}", args.listen);

    // Build config from args
    let config = Config::builder()
        .data_dir(&args.data_dir)
        .listen_addr(&args.listen)
        .verbose(args.verbose)
        .build();

    // Open the database (loads table files from the data directory)
    let db = match Database::open(config.clone()) {
        Ok(db) => Arc::new(db),
        Err(e) => {
            tracing::error!("Failed to open database: {}", e);
            std::process::exit(1);
        }
    };

    // Serve until the process is killed
    let server = Server::new(config, db);
    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
