//! Cache-aside read layer.
//!
//! Keyed by business key, populated lazily on read-miss and invalidated
//! explicitly by writers. Entries carry a sliding expiration that resets
//! on each access, bounded by an absolute ceiling; whichever fires first
//! evicts the entry. Absence is never cached, so a transient not-found
//! cannot poison the key.

use std::future::Future;
use std::time::{Duration, Instant};

use moka::future::Cache;
use moka::Expiry;
use tracing::debug;

const MAX_ENTRIES: u64 = 10_000;

/// Expiration policy for cached entries.
#[derive(Debug, Clone, Copy)]
pub struct CachePolicy {
    /// Hard ceiling measured from population.
    pub absolute_ttl: Duration,
    /// Inactivity window, reset on each access, never past the ceiling.
    pub sliding_ttl: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            absolute_ttl: Duration::from_secs(60 * 60),
            sliding_ttl: Duration::from_secs(15 * 60),
        }
    }
}

#[derive(Clone)]
struct Cached<V> {
    value: V,
    stored_at: Instant,
}

struct SlidingExpiry {
    policy: CachePolicy,
}

impl SlidingExpiry {
    fn window(&self, stored_at: Instant, now: Instant) -> Duration {
        let elapsed = now.saturating_duration_since(stored_at);
        let until_ceiling = self.policy.absolute_ttl.saturating_sub(elapsed);
        self.policy.sliding_ttl.min(until_ceiling)
    }
}

impl<V> Expiry<String, Cached<V>> for SlidingExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &Cached<V>,
        created_at: Instant,
    ) -> Option<Duration> {
        Some(self.window(value.stored_at, created_at))
    }

    fn expire_after_read(
        &self,
        _key: &String,
        value: &Cached<V>,
        read_at: Instant,
        _duration_until_expiry: Option<Duration>,
        _last_modified_at: Instant,
    ) -> Option<Duration> {
        Some(self.window(value.stored_at, read_at))
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Cached<V>,
        updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(self.window(value.stored_at, updated_at))
    }
}

/// Process-wide read cache for one view type.
///
/// Cloning is cheap and shares the underlying cache; construct one per
/// record kind at startup and hand clones to the services.
#[derive(Clone)]
pub struct ReadCache<V: Clone + Send + Sync + 'static> {
    inner: Cache<String, Cached<V>>,
}

impl<V: Clone + Send + Sync + 'static> ReadCache<V> {
    pub fn new() -> Self {
        Self::with_policy(CachePolicy::default())
    }

    pub fn with_policy(policy: CachePolicy) -> Self {
        let inner = Cache::builder()
            .max_capacity(MAX_ENTRIES)
            .expire_after(SlidingExpiry { policy })
            .build();
        Self { inner }
    }

    /// Returns the cached value for `key`, or runs `loader` to populate it.
    ///
    /// `Ok(None)` from the loader (record absent) is propagated without
    /// caching. A loader error is propagated and nothing is stored. Two
    /// concurrent cold reads may both invoke the loader; both compute the
    /// same value from the durable store, so the racing writes are
    /// harmless.
    pub async fn get_or_load<F, Fut, E>(&self, key: &str, loader: F) -> Result<Option<V>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<V>, E>>,
    {
        if let Some(hit) = self.inner.get(key).await {
            debug!(key, "cache hit");
            return Ok(Some(hit.value));
        }

        debug!(key, "cache miss");
        match loader().await? {
            Some(value) => {
                self.inner
                    .insert(
                        key.to_string(),
                        Cached {
                            value: value.clone(),
                            stored_at: Instant::now(),
                        },
                    )
                    .await;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Evicts the entry for `key`. Idempotent; a key that was never cached
    /// is a no-op.
    pub async fn invalidate(&self, key: &str) {
        self.inner.invalidate(key).await;
    }
}

impl<V: Clone + Send + Sync + 'static> Default for ReadCache<V> {
    fn default() -> Self {
        Self::new()
    }
}
