//! Study space dashboard - live seat occupancy in the terminal

use std::path::PathBuf;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use anyhow::Result;
use clap::Parser;
use signal_hook::consts::SIGINT;
use signal_hook::flag;
use studyspace_dashboard::{App, HttpStatusSource, init_file_logging};
use tracing::{info, warn};
use url::Url;

#[derive(Clone, Debug, Parser)]
#[command(version, about = "Live occupancy from all scanner nodes", long_about = None)]
struct Args {
    /// Base URL of the collector serving `/api/status`
    #[arg(
        long,
        default_value = "http://localhost:8080",
        env = "STUDYSPACE_COLLECTOR_URL"
    )]
    collector_url: Url,

    /// Directory for the rolling log file
    #[arg(long, default_value = "/tmp/studyspace", env = "STUDYSPACE_LOG_DIR")]
    log_dir: PathBuf,
}

/// Main entry point for the dashboard
fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = init_file_logging(&args.log_dir)?;
    info!("Starting study space dashboard");

    // Create shutdown flag for signal handling
    let shutdown_flag = Arc::new(AtomicBool::new(false));

    // Register signal handler for graceful shutdown
    if let Err(e) = flag::register(SIGINT, Arc::clone(&shutdown_flag)) {
        warn!("Failed to register SIGINT handler: {}", e);
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let source = HttpStatusSource::new(&args.collector_url)?;
    info!("Polling {}", source.status_url());

    let mut app = App::new(source, runtime.handle().clone());
    app.set_shutdown_flag(shutdown_flag.clone());

    // Create a custom panic hook that cleans up the terminal
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = crossterm::execute!(
            std::io::stderr(),
            crossterm::terminal::LeaveAlternateScreen,
            crossterm::event::DisableMouseCapture
        );
        let _ = crossterm::terminal::disable_raw_mode();

        default_panic(panic_info);
    }));

    if let Err(e) = app.run() {
        let _ = crossterm::terminal::disable_raw_mode();
        eprintln!("Application error: {e}");
        std::process::exit(1);
    }

    if shutdown_flag.load(Ordering::Relaxed) {
        info!("Shutdown via signal complete");
    }

    info!("Study space dashboard exiting normally");
    Ok(())
}
