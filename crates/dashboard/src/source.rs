use async_trait::async_trait;
use reqwest::Client;
use studyspace_occupancy::{NodeStatus, STATUS_PATH};
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};

/// Something that can report the current status of every scanner node.
#[async_trait]
pub trait StatusSource: Send + Sync + 'static {
    /// Fetches the latest reading of every node.
    async fn fetch_status(&self) -> Result<Vec<NodeStatus>>;
}

/// Reads node status from a collector's `/api/status` endpoint.
#[derive(Debug, Clone)]
pub struct HttpStatusSource {
    client: Client,
    status_url: Url,
}

impl HttpStatusSource {
    /// Creates a source polling the collector at `collector_url`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if the status path cannot be joined onto
    /// `collector_url`.
    pub fn new(collector_url: &Url) -> Result<Self> {
        Ok(Self {
            client: Client::new(),
            status_url: collector_url.join(STATUS_PATH)?,
        })
    }

    /// The full URL that is polled.
    #[must_use]
    pub const fn status_url(&self) -> &Url {
        &self.status_url
    }
}

#[async_trait]
impl StatusSource for HttpStatusSource {
    async fn fetch_status(&self) -> Result<Vec<NodeStatus>> {
        let response = self.client.get(self.status_url.clone()).send().await?;

        if !response.status().is_success() {
            return Err(Error::Status(response.status()));
        }

        let body = response.bytes().await?;
        let nodes: Vec<NodeStatus> = serde_json::from_slice(&body)?;

        debug!("fetched {} node readings from {}", nodes.len(), self.status_url);

        Ok(nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_url_is_absolute_path() {
        let base = Url::parse("http://localhost:8080").unwrap();
        let source = HttpStatusSource::new(&base).unwrap();
        assert_eq!(source.status_url().as_str(), "http://localhost:8080/api/status");

        let nested = Url::parse("http://collector.local/dashboard/").unwrap();
        let source = HttpStatusSource::new(&nested).unwrap();
        assert_eq!(source.status_url().as_str(), "http://collector.local/api/status");
    }
}
