use chrono::{SecondsFormat, Utc};
use indexmap::IndexMap;
use parking_lot::RwLock;
use studyspace_occupancy::NodeStatus;

/// Last reading of every node that has reported, in first-report order.
#[derive(Debug, Default)]
pub struct ReadingStore {
    readings: RwLock<IndexMap<String, NodeStatus>>,
}

impl ReadingStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a reading for `node_id`, stamped with the current time.
    ///
    /// Replaces any previous reading of the node and returns the stored entry.
    pub fn record(&self, node_id: &str, free_seats: i64, total_seats: i64) -> NodeStatus {
        let status = NodeStatus {
            node_id: node_id.to_string(),
            free_seats: Some(free_seats),
            total_seats: Some(total_seats),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false),
        };

        self.readings
            .write()
            .insert(node_id.to_string(), status.clone());

        status
    }

    /// Snapshot of the latest reading per node.
    #[must_use]
    pub fn snapshot(&self) -> Vec<NodeStatus> {
        self.readings.read().values().cloned().collect()
    }

    /// Number of nodes that have reported.
    #[must_use]
    pub fn len(&self) -> usize {
        self.readings.read().len()
    }

    /// `true` until the first report arrives.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.readings.read().is_empty()
    }
}
