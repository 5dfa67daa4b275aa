//! gamevault Server Binary
//!
//! Loads the document and serves the videogame service over TCP.

use std::sync::Arc;

use clap::{Parser, ValueEnum};
use gamevault::network::Server;
use gamevault::{Config, IdStrategy, VideogameService};
use tracing_subscriber::{fmt, EnvFilter};

/// gamevault Server
#[derive(Parser, Debug)]
#[command(name = "gamevault-server")]
#[command(about = "Remote CRUD service over a JSON videogame collection")]
#[command(version)]
struct Args {
    /// Backing JSON document
    #[arg(short, long, default_value = "./videogames.json")]
    document: String,

    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:1099")]
    listen: String,

    /// Name the service is bound under
    #[arg(short, long, default_value = "VideogameService")]
    service: String,

    /// Worker threads serving connections
    #[arg(short, long, default_value = "8")]
    workers: usize,

    /// Maximum connections waiting for a worker
    #[arg(short, long, default_value = "1024")]
    max_connections: usize,

    /// How ids are assigned to created records
    #[arg(long, value_enum, default_value = "sequential")]
    id_strategy: IdStrategyArg,

    /// Write the document without indentation
    #[arg(long)]
    compact: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum IdStrategyArg {
    Sequential,
    Clock,
}

impl From<IdStrategyArg> for IdStrategy {
    fn from(arg: IdStrategyArg) -> Self {
        match arg {
            IdStrategyArg::Sequential => IdStrategy::Sequential,
            IdStrategyArg::Clock => IdStrategy::Clock,
        }
    }
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,gamevault=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("gamevault Server v{}", gamevault::VERSION);
    tracing::info!("Document: {}", args.document);
    tracing::info!("Listen address: {}", args.listen);

    let config = Config::builder()
        .document_path(&args.document)
        .listen_addr(&args.listen)
        .service_name(&args.service)
        .worker_threads(args.workers)
        .max_connections(args.max_connections)
        .id_strategy(args.id_strategy.into())
        .pretty(!args.compact)
        .build();

    let service = match VideogameService::open(config.clone()) {
        Ok(s) => Arc::new(s),
        Err(e) => {
            tracing::error!("Failed to open service: {}", e);
            std::process::exit(1);
        }
    };

    let server = match Server::bind(config, service) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to start server: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
