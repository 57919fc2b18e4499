// Conditions service - Demand-driven refresh of the published feed
use crate::application::conditions_composer::compose_conditions;
use crate::application::readings_source::{FetchError, ReadingsSource};
use crate::application::refresh_cache::RefreshCache;
use crate::domain::conditions::SiteConditions;
use crate::domain::topology::SiteTopology;
use crate::infrastructure::water_services::{extract_readings, ExtractError};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RefreshError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

#[derive(Clone)]
pub struct ConditionsService {
    source: Arc<dyn ReadingsSource>,
    topology: Arc<SiteTopology>,
    cache: Arc<RefreshCache>,
}

impl ConditionsService {
    pub fn new(source: Arc<dyn ReadingsSource>, topology: Arc<SiteTopology>, cache: Arc<RefreshCache>) -> Self {
        Self {
            source,
            topology,
            cache,
        }
    }

    /// Current conditions for every site, refreshing from upstream when the
    /// cached payload is missing or older than the TTL.
    ///
    /// Failures are returned as-is and never replace or fall back to the
    /// cached payload.
    pub async fn current_conditions(&self) -> Result<Vec<SiteConditions>, RefreshError> {
        let requested_at = Instant::now();
        if let Some(payload) = self.cache.fresh().await {
            return Ok(payload);
        }

        let _gate = self.cache.refresh_gate().await;
        // Another request may have refreshed while we waited
        if let Some(payload) = self.cache.fresh().await {
            return Ok(payload);
        }

        let payload = self.refresh().await?;
        self.cache.store(payload.clone(), requested_at).await;
        Ok(payload)
    }

    async fn refresh(&self) -> Result<Vec<SiteConditions>, RefreshError> {
        let started = Instant::now();
        let previous_age = self.cache.fetched_at().await.map(|at| at.elapsed().as_secs());
        tracing::debug!(
            stations = self.topology.all_station_ids().len(),
            ttl_secs = self.cache.ttl().as_secs(),
            ?previous_age,
            "Refreshing river conditions"
        );

        let body = self.source.fetch_batch(self.topology.all_station_ids()).await?;
        let readings = extract_readings(&body)?;
        let payload = compose_conditions(&self.topology, &readings);

        tracing::info!(
            stations_reported = readings.len(),
            sites = payload.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Refreshed river conditions"
        );
        Ok(payload)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::application::refresh_cache::CACHE_TTL;
    use crate::domain::topology::TopologyEntry;
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Scripted upstream: pops one response per call, repeating the last one.
    pub(crate) struct StubSource {
        responses: Mutex<VecDeque<Result<Bytes, FetchError>>>,
        calls: AtomicUsize,
        latency: Duration,
    }

    impl StubSource {
        pub(crate) fn new(responses: Vec<Result<Bytes, FetchError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: AtomicUsize::new(0),
                latency: Duration::ZERO,
            }
        }

        pub(crate) fn with_latency(mut self, latency: Duration) -> Self {
            self.latency = latency;
            self
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    fn clone_response(response: &Result<Bytes, FetchError>) -> Result<Bytes, FetchError> {
        match response {
            Ok(body) => Ok(body.clone()),
            Err(FetchError::Timeout(d)) => Err(FetchError::Timeout(*d)),
            Err(FetchError::Request(msg)) => Err(FetchError::Request(msg.clone())),
            Err(FetchError::Status { status, body }) => Err(FetchError::Status {
                status: *status,
                body: body.clone(),
            }),
        }
    }

    #[async_trait]
    impl ReadingsSource for StubSource {
        async fn fetch_batch(&self, _station_ids: &[String]) -> Result<Bytes, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }
            let mut responses = self.responses.lock().unwrap();
            if responses.len() > 1 {
                responses.pop_front().unwrap()
            } else {
                clone_response(responses.front().unwrap())
            }
        }
    }

    pub(crate) fn series_json(site: &str, name: &str, code: &str, values: &[(&str, Option<&str>)]) -> serde_json::Value {
        let values: Vec<serde_json::Value> = values
            .iter()
            .map(|(time, value)| serde_json::json!({ "value": value, "dateTime": time }))
            .collect();
        serde_json::json!({
            "sourceInfo": { "siteName": name, "siteCode": [{ "value": site }] },
            "variable": { "variableCode": [{ "value": code }] },
            "values": [{ "value": values }]
        })
    }

    pub(crate) fn sample_body() -> Bytes {
        let series = vec![
            series_json(
                "P",
                "PRIMARY RIVER AT TOWN",
                "00065",
                &[("2024-01-01T00:00Z", Some("5.2")), ("2024-01-01T01:00Z", Some("-999999"))],
            ),
            series_json("X", "AUX CREEK", "00010", &[("2024-01-01T00:00Z", Some("10.0"))]),
        ];
        Bytes::from(serde_json::json!({ "value": { "timeSeries": series } }).to_string())
    }

    pub(crate) fn sample_topology() -> Arc<SiteTopology> {
        Arc::new(SiteTopology::new(vec![TopologyEntry::new("P", &["X", "Y"], 39.5, -86.1)]).unwrap())
    }

    fn service(source: Arc<StubSource>, ttl: Duration) -> ConditionsService {
        ConditionsService::new(source, sample_topology(), Arc::new(RefreshCache::new(ttl)))
    }

    #[tokio::test]
    async fn test_refresh_composes_feed() {
        let source = Arc::new(StubSource::new(vec![Ok(sample_body())]));
        let service = service(source.clone(), CACHE_TTL);

        let conditions = service.current_conditions().await.unwrap();

        assert_eq!(conditions.len(), 1);
        assert_eq!(conditions[0].name, "PRIMARY RIVER AT TOWN");
        assert_eq!(conditions[0].gage_height_ft, Some(5.2));
        assert_eq!(conditions[0].gage_time.as_deref(), Some("2024-01-01T00:00Z"));
        assert_eq!(conditions[0].avg_temp_c, Some(10.0));
        assert_eq!(conditions[0].avg_temp_f, Some(50.0));
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_cache_hit_skips_upstream() {
        let source = Arc::new(StubSource::new(vec![Ok(sample_body())]));
        let service = service(source.clone(), CACHE_TTL);

        let first = service.current_conditions().await.unwrap();
        let second = service.current_conditions().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_expired_cache_refreshes_every_call() {
        let source = Arc::new(StubSource::new(vec![Ok(sample_body())]));
        let service = service(source.clone(), Duration::ZERO);

        service.current_conditions().await.unwrap();
        service.current_conditions().await.unwrap();
        service.current_conditions().await.unwrap();

        assert_eq!(source.calls(), 3);
    }

    #[tokio::test]
    async fn test_transport_failure_leaves_cache_untouched() {
        let source = Arc::new(StubSource::new(vec![
            Ok(sample_body()),
            Err(FetchError::Timeout(Duration::from_secs(15))),
        ]));
        let service = service(source.clone(), Duration::ZERO);

        service.current_conditions().await.unwrap();
        let stored_at = service.cache.fetched_at().await;

        let err = service.current_conditions().await.unwrap_err();

        assert!(matches!(err, RefreshError::Fetch(FetchError::Timeout(_))));
        assert_eq!(service.cache.fetched_at().await, stored_at);
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_extraction_failure_is_not_cached() {
        let source = Arc::new(StubSource::new(vec![
            Ok(Bytes::from_static(br#"{"value": {}}"#)),
            Ok(sample_body()),
        ]));
        let service = service(source.clone(), CACHE_TTL);

        let err = service.current_conditions().await.unwrap_err();
        assert!(matches!(err, RefreshError::Extract(_)));
        assert!(service.cache.fetched_at().await.is_none());

        let conditions = service.current_conditions().await.unwrap();
        assert_eq!(conditions[0].gage_height_ft, Some(5.2));
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_entry_is_stamped_when_request_arrives() {
        let source = Arc::new(StubSource::new(vec![Ok(sample_body())]).with_latency(Duration::from_millis(300)));
        let service = service(source.clone(), CACHE_TTL);

        let before = Instant::now();
        service.current_conditions().await.unwrap();
        let stored_at = service.cache.fetched_at().await.unwrap();

        assert!(stored_at >= before);
        assert!(stored_at.duration_since(before) < Duration::from_millis(300));
    }

    #[tokio::test]
    async fn test_concurrent_misses_share_one_refresh() {
        let source = Arc::new(StubSource::new(vec![Ok(sample_body())]).with_latency(Duration::from_millis(20)));
        let service = service(source.clone(), CACHE_TTL);

        let results = futures::future::join_all((0..8).map(|_| service.current_conditions())).await;

        assert!(results.iter().all(|r| r.is_ok()));
        assert_eq!(source.calls(), 1);
    }
}
