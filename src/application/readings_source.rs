// Source trait for batched upstream readings
use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;
use thiserror::Error;

/// Transport-level failures talking to the upstream feed.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("request failed: {0}")]
    Request(String),

    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },
}

#[async_trait]
pub trait ReadingsSource: Send + Sync {
    /// Fetch the raw batch response covering every given station and both
    /// parameter codes in a single request.
    async fn fetch_batch(&self, station_ids: &[String]) -> Result<Bytes, FetchError>;
}
