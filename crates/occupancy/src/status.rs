use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// Node id recorded when a report does not name its node.
pub const UNKNOWN_NODE_ID: &str = "unknown";

/// The last reading of a single scanner node, as served on the status endpoint.
///
/// Seat counts are signed and optional: the endpoint is not trusted to uphold
/// `0 <= free_seats <= total_seats`, and a node may omit either count. A count
/// that is not a whole number decodes as `None` instead of failing the whole
/// response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeStatus {
    /// Identifier of the scanner node.
    #[serde(default)]
    pub node_id: String,

    /// Seats currently unoccupied.
    #[serde(default, deserialize_with = "lenient_count")]
    pub free_seats: Option<i64>,

    /// Total seats covered by the node.
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_seats: Option<i64>,

    /// When the node last reported.
    #[serde(default)]
    pub timestamp: String,
}

/// A reading posted by a scanner node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyReport {
    /// Identifier of the reporting node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,

    /// Seats currently unoccupied.
    #[serde(default, deserialize_with = "lenient_count")]
    pub free_seats: Option<i64>,

    /// Total seats covered by the node.
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_seats: Option<i64>,
}

impl OccupancyReport {
    /// Creates a complete report for `node_id`.
    #[must_use]
    pub fn new(node_id: impl Into<String>, free_seats: i64, total_seats: i64) -> Self {
        Self {
            node_id: Some(node_id.into()),
            free_seats: Some(free_seats),
            total_seats: Some(total_seats),
        }
    }

    /// The node id, or [`UNKNOWN_NODE_ID`] when the report omitted it.
    #[must_use]
    pub fn node_id_or_unknown(&self) -> &str {
        self.node_id.as_deref().unwrap_or(UNKNOWN_NODE_ID)
    }
}

/// Acknowledgement returned for an accepted report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportAck {
    /// Always `"ok"`.
    pub status: String,

    /// The node the reading was stored under.
    pub node_id: String,
}

impl ReportAck {
    /// Acknowledges a reading stored under `node_id`.
    #[must_use]
    pub fn ok(node_id: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            node_id: node_id.into(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCount {
    Integer(i64),
    Float(f64),
    Other(#[allow(dead_code)] IgnoredAny),
}

/// Reads a seat count, accepting whole floats such as `3.0`.
///
/// Fractions, strings and any other JSON value become `None`.
#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let count = match Option::<RawCount>::deserialize(deserializer)? {
        Some(RawCount::Integer(count)) => Some(count),
        Some(RawCount::Float(count)) if count.is_finite() && count.fract() == 0.0 => {
            Some(count as i64)
        }
        Some(RawCount::Float(_) | RawCount::Other(_)) | None => None,
    };

    Ok(count)
}

/// Error body returned by the collector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Human readable reason.
    pub error: String,
}

impl ApiError {
    /// Creates an error body.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
