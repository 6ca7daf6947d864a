use std::fmt;

use chrono::{Local, TimeZone};

use crate::status::NodeStatus;
use crate::timestamp::last_update_in;

/// Label shown for a seat count the node did not report.
const UNKNOWN: &str = "unknown";

/// Percentage of `total` taken up by `used`, rounded half up.
///
/// Returns 0 when `total` is not positive.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn occupancy_percent(used: i64, total: i64) -> i64 {
    if total <= 0 {
        return 0;
    }

    (used as f64 / total as f64)
        .mul_add(100.0, 0.5)
        .floor() as i64
}

/// Whether a node has any free seat left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    /// The node reported exactly zero free seats.
    Full,

    /// Anything else, including an unreported free seat count.
    Available,
}

impl Availability {
    /// Classifies a reported free seat count.
    #[must_use]
    pub const fn from_free_seats(free_seats: Option<i64>) -> Self {
        match free_seats {
            Some(0) => Self::Full,
            _ => Self::Available,
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "full"),
            Self::Available => write!(f, "available"),
        }
    }
}

/// Totals across every node of one status response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FleetSummary {
    /// Number of node entries.
    pub total_nodes: usize,

    /// Sum of reported total seats.
    pub total_seats: i64,

    /// Sum of reported free seats.
    pub total_free: i64,

    /// `total_seats - total_free`.
    pub total_used: i64,

    /// Rounded percentage of seats in use.
    pub overall_occupancy: i64,
}

impl FleetSummary {
    /// Aggregates a status response. Missing seat counts count as zero.
    ///
    /// Sums saturate at the bounds of `i64`.
    #[must_use]
    pub fn from_nodes(nodes: &[NodeStatus]) -> Self {
        let total_seats = saturating_sum(nodes.iter().map(|n| n.total_seats.unwrap_or(0)));
        let total_free = saturating_sum(nodes.iter().map(|n| n.free_seats.unwrap_or(0)));
        let total_used = total_seats.saturating_sub(total_free);

        Self {
            total_nodes: nodes.len(),
            total_seats,
            total_free,
            total_used,
            overall_occupancy: occupancy_percent(total_used, total_seats),
        }
    }
}

fn saturating_sum(counts: impl Iterator<Item = i64>) -> i64 {
    counts.fold(0, i64::saturating_add)
}

/// Display metrics for one node card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSummary {
    /// Identifier of the scanner node.
    pub node_id: String,

    /// Seats in use.
    pub used: i64,

    /// Reported free seats.
    pub free_seats: Option<i64>,

    /// Reported total seats.
    pub total_seats: Option<i64>,

    /// Rounded percentage of the node's seats in use.
    pub occupancy: i64,

    /// Full or available.
    pub availability: Availability,

    /// Local time of day of the last report, or `"n/a"`.
    pub last_update: String,
}

impl NodeSummary {
    /// Derives the card metrics for `status`, showing times in the local zone.
    #[must_use]
    pub fn from_status(status: &NodeStatus) -> Self {
        Self::from_status_in(status, &Local)
    }

    /// Derives the card metrics for `status`, showing times in `tz`.
    #[must_use]
    pub fn from_status_in<Tz>(status: &NodeStatus, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let total = status.total_seats.unwrap_or(0);
        let used = total.saturating_sub(status.free_seats.unwrap_or(0));

        Self {
            node_id: status.node_id.clone(),
            used,
            free_seats: status.free_seats,
            total_seats: status.total_seats,
            occupancy: occupancy_percent(used, total),
            availability: Availability::from_free_seats(status.free_seats),
            last_update: last_update_in(&status.timestamp, tz),
        }
    }

    /// `true` when the node reported zero free seats.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.availability == Availability::Full
    }

    /// `"<used>/<total> used"`.
    #[must_use]
    pub fn used_label(&self) -> String {
        let total = self
            .total_seats
            .map_or_else(|| UNKNOWN.to_string(), |t| t.to_string());
        format!("{}/{total} used", self.used)
    }

    /// The free seat count, or `"unknown"`.
    #[must_use]
    pub fn free_seats_label(&self) -> String {
        self.free_seats
            .map_or_else(|| UNKNOWN.to_string(), |f| f.to_string())
    }
}
