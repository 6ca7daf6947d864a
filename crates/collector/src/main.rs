//! Collector binary: receives scanner reports and serves the status array.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use studyspace_collector::{CollectorServer, ReadingStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug, Parser)]
#[command(version, about = "Collects study space scanner readings", long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0:8080", env = "STUDYSPACE_LISTEN_ADDR")]
    listen_addr: SocketAddr,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let server = CollectorServer::new(args.listen_addr, Arc::new(ReadingStore::new()));
    server.start().await?;

    tokio::signal::ctrl_c().await?;
    info!("Ctrl+C received");

    server.shutdown().await;

    Ok(())
}
