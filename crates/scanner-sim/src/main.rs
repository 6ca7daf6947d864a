//! Scanner simulator binary: reports a simulated node to the collector.

use std::time::Duration;

use clap::Parser;
use studyspace_scanner_sim::{Reporter, SeatScanner};
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Clone, Debug, Parser)]
#[command(version, about = "Simulates a study space scanner node", long_about = None)]
struct Args {
    /// Base URL of the collector
    #[arg(
        long,
        default_value = "http://localhost:8080",
        env = "STUDYSPACE_COLLECTOR_URL"
    )]
    collector_url: Url,

    /// Identifier reported for this node
    #[arg(long, default_value = "lb8-node-1", env = "STUDYSPACE_NODE_ID")]
    node_id: String,

    /// Seats covered by this node
    #[arg(long, default_value_t = 4, env = "STUDYSPACE_TOTAL_SEATS")]
    total_seats: u32,

    /// Seconds between two reports
    #[arg(long, default_value_t = 10, env = "STUDYSPACE_REPORT_INTERVAL_SECS")]
    interval_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let reporter = Reporter::new(&args.collector_url, args.node_id)?;
    let mut scanner = SeatScanner::new(args.total_seats);

    info!(
        "Reporting {} to {} every {}s",
        reporter.node_id(),
        reporter.occupancy_url(),
        args.interval_secs
    );

    let mut ticker = tokio::time::interval(Duration::from_secs(args.interval_secs.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let free = scanner.scan();
                match reporter.report(free, scanner.total_seats()).await {
                    Ok(_) => info!("Reported {}/{} seats free", free, scanner.total_seats()),
                    Err(e) => warn!("Failed to report reading: {}", e),
                }
            }
            result = tokio::signal::ctrl_c() => {
                result?;
                info!("Ctrl+C received");
                break;
            }
        }
    }

    Ok(())
}
