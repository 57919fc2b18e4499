// Water services HTTP client
use crate::application::readings_source::{FetchError, ReadingsSource};
use crate::domain::parameter::ParameterKind;
use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct WaterServicesClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl WaterServicesClient {
    pub fn new(base_url: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to build water services HTTP client")?;

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    fn build_batch_url(&self, station_ids: &[String]) -> String {
        let sites = station_ids.join(",");
        let parameters = ParameterKind::ALL.map(ParameterKind::code).join(",");
        format!(
            "{}?sites={}&parameterCd={}&format=json",
            self.base_url,
            urlencoding::encode(&sites),
            urlencoding::encode(&parameters)
        )
    }

    fn map_request_error(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::Request(err.to_string())
        }
    }
}

#[async_trait]
impl ReadingsSource for WaterServicesClient {
    async fn fetch_batch(&self, station_ids: &[String]) -> Result<Bytes, FetchError> {
        let url = self.build_batch_url(station_ids);
        tracing::debug!(%url, "Requesting water services batch");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status, "Water services request failed");
            return Err(FetchError::Status {
                status,
                body: body.chars().take(500).collect(),
            });
        }

        response.bytes().await.map_err(|e| self.map_request_error(e))
    }
}
