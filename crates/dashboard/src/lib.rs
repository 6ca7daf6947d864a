//! Study space dashboard - terminal view of live seat occupancy

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::redundant_pub_crate)]

/// Application state and logic
pub mod app;
/// Error types
pub mod error;
/// File logging
pub mod logging;
/// Fixed-cadence status polling
pub mod poller;
/// Status sources
pub mod source;
/// Dashboard view state
pub mod state;
/// UI components
pub mod ui;

pub use app::App;
pub use error::{Error, Result};
pub use logging::init_file_logging;
pub use poller::{POLL_INTERVAL, PollOutcome, Poller, PollerHandle};
pub use source::{HttpStatusSource, StatusSource};
pub use state::{DashboardState, DashboardView, LOAD_FAILED_MESSAGE};
