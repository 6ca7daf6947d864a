//! View state of the dashboard, driven by poll outcomes.

use std::collections::HashSet;

use studyspace_occupancy::NodeStatus;
use tracing::{error, warn};

use crate::poller::PollOutcome;

/// The message shown for any failed poll cycle.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load status.";

/// What the dashboard should currently show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardView<'a> {
    /// No poll cycle has resolved yet.
    Loading,

    /// The most recent poll cycle failed.
    Failed(&'a str),

    /// The endpoint reported no nodes.
    Empty,

    /// Stat cards and one card per node.
    Populated(&'a [NodeStatus]),
}

/// Node list and loading/error flags, replaced by every poll outcome.
#[derive(Debug)]
pub struct DashboardState {
    nodes: Vec<NodeStatus>,
    loading: bool,
    error: Option<String>,
}

impl DashboardState {
    /// State before the first poll cycle resolves.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            loading: true,
            error: None,
        }
    }

    /// Applies the outcome of one poll cycle.
    ///
    /// A success replaces the node list wholesale and clears the error. A
    /// failure is logged and leaves the previous node list in place.
    pub fn apply(&mut self, outcome: PollOutcome) {
        match outcome {
            Ok(nodes) => {
                warn_on_duplicates(&nodes);
                self.nodes = nodes;
                self.error = None;
            }
            Err(e) => {
                error!("failed to load status: {}", e);
                self.error = Some(LOAD_FAILED_MESSAGE.to_string());
            }
        }

        self.loading = false;
    }

    /// The view to render, in precedence loading, error, empty, populated.
    #[must_use]
    pub fn view(&self) -> DashboardView<'_> {
        if self.loading {
            DashboardView::Loading
        } else if let Some(error) = &self.error {
            DashboardView::Failed(error)
        } else if self.nodes.is_empty() {
            DashboardView::Empty
        } else {
            DashboardView::Populated(&self.nodes)
        }
    }

    /// The last successfully fetched nodes.
    #[must_use]
    pub fn nodes(&self) -> &[NodeStatus] {
        &self.nodes
    }

    /// `true` until the first poll cycle resolves.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// The user-visible error of the last cycle, if it failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}

fn warn_on_duplicates(nodes: &[NodeStatus]) {
    let mut seen = HashSet::with_capacity(nodes.len());
    for node in nodes {
        if !seen.insert(node.node_id.as_str()) {
            warn!("status response lists node {} more than once", node.node_id);
        }
    }
}
