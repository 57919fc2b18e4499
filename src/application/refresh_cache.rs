// Refresh cache - Single slot for the published feed, replaced wholesale under the write lock

use crate::domain::conditions::SiteConditions;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, MutexGuard, RwLock};
use tracing::debug;

/// Default time a refreshed payload stays fresh.
pub const CACHE_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
struct CacheEntry {
    payload: Vec<SiteConditions>,
    fetched_at: Instant,
}

pub struct RefreshCache {
    slot: RwLock<Option<CacheEntry>>,
    refresh_gate: Mutex<()>,
    ttl: Duration,
}

impl RefreshCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            slot: RwLock::new(None),
            refresh_gate: Mutex::new(()),
            ttl,
        }
    }

    /// Cached payload if one exists and is younger than the TTL.
    pub async fn fresh(&self) -> Option<Vec<SiteConditions>> {
        let guard = self.slot.read().await;
        match guard.as_ref() {
            Some(entry) if entry.fetched_at.elapsed() < self.ttl => {
                debug!(age_ms = entry.fetched_at.elapsed().as_millis() as u64, "Conditions cache hit");
                Some(entry.payload.clone())
            }
            Some(_) => {
                debug!("Conditions cache expired");
                None
            }
            None => {
                debug!("Conditions cache empty");
                None
            }
        }
    }

    /// Replace the slot with a fully built payload. `requested_at` is when
    /// the request that triggered the refresh arrived.
    pub async fn store(&self, payload: Vec<SiteConditions>, requested_at: Instant) {
        let entry = CacheEntry {
            payload,
            fetched_at: requested_at,
        };
        *self.slot.write().await = Some(entry);
    }

    /// Serialize refreshes. Holders should re-check `fresh()` after acquiring.
    pub async fn refresh_gate(&self) -> MutexGuard<'_, ()> {
        self.refresh_gate.lock().await
    }

    /// When the slot was last populated, stale or not.
    pub async fn fetched_at(&self) -> Option<Instant> {
        self.slot.read().await.as_ref().map(|entry| entry.fetched_at)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
