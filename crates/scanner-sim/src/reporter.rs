use reqwest::Client;
use studyspace_occupancy::{OCCUPANCY_PATH, OccupancyReport, ReportAck};
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};

/// Posts readings of one node to a collector.
#[derive(Debug, Clone)]
pub struct Reporter {
    client: Client,
    node_id: String,
    occupancy_url: Url,
}

impl Reporter {
    /// Creates a reporter for `node_id` posting to the collector at `collector_url`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if the occupancy path cannot be joined onto
    /// `collector_url`.
    pub fn new(collector_url: &Url, node_id: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: Client::new(),
            node_id: node_id.into(),
            occupancy_url: collector_url.join(OCCUPANCY_PATH)?,
        })
    }

    /// The node the readings are reported for.
    #[must_use]
    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    /// The full URL readings are posted to.
    #[must_use]
    pub const fn occupancy_url(&self) -> &Url {
        &self.occupancy_url
    }

    /// Posts one reading and returns the collector's acknowledgement.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Status`] if the collector answers with a non-success
    /// status, and [`Error::Network`] if the request fails or the
    /// acknowledgement cannot be decoded.
    pub async fn report(&self, free_seats: u32, total_seats: u32) -> Result<ReportAck> {
        let report = OccupancyReport::new(
            self.node_id.as_str(),
            i64::from(free_seats),
            i64::from(total_seats),
        );

        let response = self
            .client
            .post(self.occupancy_url.clone())
            .json(&report)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Status(response.status()));
        }

        let ack: ReportAck = response.json().await?;
        debug!("collector acknowledged reading of {}", ack.node_id);

        Ok(ack)
    }
}
