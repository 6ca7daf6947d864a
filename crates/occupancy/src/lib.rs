//! Seat occupancy types shared by the scanner nodes, the collector and the
//! dashboard, plus the metrics derived from them.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::redundant_pub_crate)]

mod status;
mod summary;
mod timestamp;

pub use status::{ApiError, NodeStatus, OccupancyReport, ReportAck, UNKNOWN_NODE_ID};
pub use summary::{Availability, FleetSummary, NodeSummary, occupancy_percent};
pub use timestamp::{NOT_AVAILABLE, last_update, last_update_in, parse_timestamp};

/// Path the collector serves the latest reading of every node on.
pub const STATUS_PATH: &str = "/api/status";

/// Path scanner nodes post their readings to.
pub const OCCUPANCY_PATH: &str = "/api/occupancy";
