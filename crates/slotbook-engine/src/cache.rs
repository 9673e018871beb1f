//! Availability cache with TTL support.
//!
//! This module defines the [`AvailabilityCache`] port consumed by the
//! engine, the key formats shared with external cache-warming tooling, and
//! [`MemoryCache`], an in-process implementation whose expiry follows the
//! injected [`Clock`].
//!
//! Entries are opaque bytes. They are never mutated in place: a write
//! replaces the whole entry and an invalidation deletes it.
//!
//! Every invalidation also bumps the key's generation. A reader that notes
//! the generation before computing a view and stores it with
//! [`AvailabilityCache::set_if_current`] can never resurrect a view that a
//! concurrent write has already invalidated.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, trace};

use slotbook_core::Clock;
use slotbook_store::BoxFuture;

/// Errors raised by a cache collaborator.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The cache could not be reached.
    #[error("cache unavailable: {0}")]
    Unavailable(String),

    /// A cached value could not be encoded or decoded.
    #[error("cache serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Key/value cache for computed availability views.
pub trait AvailabilityCache: Send + Sync {
    /// Returns the value stored under `key`, if present and not expired.
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, CacheResult<Option<Vec<u8>>>>;

    /// Stores `value` under `key`, replacing any previous entry.
    ///
    /// `ttl` of `None` uses the cache's default expiry policy.
    fn set<'a>(
        &'a self,
        key: &'a str,
        value: Vec<u8>,
        ttl: Option<Duration>,
    ) -> BoxFuture<'a, CacheResult<()>>;

    /// Deletes the entry stored under `key` and bumps its generation.
    fn invalidate<'a>(&'a self, key: &'a str) -> BoxFuture<'a, CacheResult<()>>;

    /// Returns the number of times `key` has been invalidated.
    fn generation<'a>(&'a self, key: &'a str) -> BoxFuture<'a, CacheResult<u64>>;

    /// Like [`set`](Self::set), but only while `key` is still at
    /// `generation`. Returns false if the value was discarded.
    fn set_if_current<'a>(
        &'a self,
        key: &'a str,
        value: Vec<u8>,
        ttl: Option<Duration>,
        generation: u64,
    ) -> BoxFuture<'a, CacheResult<bool>>;
}

/// Cache key formats.
///
/// The day keys must match exactly for interoperability with external
/// tooling: `provider-day-availability:{provider}:{yyyyMMdd}` and
/// `provider-appointments:{provider}:{yyyyMMdd}`.
pub struct CacheKey;

impl CacheKey {
    /// Key of a provider's per-hour view of one day.
    pub fn day_availability(provider_id: &str, date: NaiveDate) -> String {
        format!("provider-day-availability:{}:{}", provider_id, date.format("%Y%m%d"))
    }

    /// Key of a provider's appointment list for one day.
    pub fn day_appointments(provider_id: &str, date: NaiveDate) -> String {
        format!("provider-appointments:{}:{}", provider_id, date.format("%Y%m%d"))
    }

    /// Key of a provider's per-day view of one month.
    pub fn month_availability(provider_id: &str, year: i32, month: u32) -> String {
        format!("provider-month-availability:{}:{:04}{:02}", provider_id, year, month)
    }

    /// Every key whose cached view changes when `provider_id` books `date`.
    pub fn affected_by(provider_id: &str, date: NaiveDateTime) -> [String; 3] {
        let day = date.date();
        [
            Self::day_availability(provider_id, day),
            Self::day_appointments(provider_id, day),
            Self::month_availability(provider_id, day.year(), day.month()),
        ]
    }
}

/// Cache entry containing an encoded view and its expiry.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Encoded value.
    value: Arc<[u8]>,
    /// When the entry was written (cache clock).
    pub stored_at: NaiveDateTime,
    /// When the entry expires, if ever (cache clock).
    expires_at: Option<NaiveDateTime>,
}

impl CacheEntry {
    fn new(value: Vec<u8>, now: NaiveDateTime, ttl: Option<Duration>) -> Self {
        let expires_at = ttl
            .and_then(|ttl| chrono::Duration::from_std(ttl).ok())
            .and_then(|ttl| now.checked_add_signed(ttl));
        Self {
            value: value.into(),
            stored_at: now,
            expires_at,
        }
    }

    /// Returns true if the entry has expired at `now`.
    pub fn is_expired(&self, now: NaiveDateTime) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }

    /// Returns the time left before expiry at `now`, or `None` if it never expires.
    pub fn time_until_expiry(&self, now: NaiveDateTime) -> Option<Duration> {
        self.expires_at
            .map(|at| (at - now).to_std().unwrap_or(Duration::ZERO))
    }

    /// Returns the encoded value.
    pub fn value(&self) -> &[u8] {
        &self.value
    }
}

#[derive(Default)]
struct Slots {
    entries: HashMap<String, CacheEntry>,
    generations: HashMap<String, u64>,
}

impl Slots {
    fn generation(&self, key: &str) -> u64 {
        self.generations.get(key).copied().unwrap_or(0)
    }
}

/// In-process [`AvailabilityCache`].
pub struct MemoryCache {
    /// Default TTL for entries written without one; `None` keeps them forever.
    default_ttl: Option<Duration>,
    slots: RwLock<Slots>,
    clock: Arc<dyn Clock>,
    unavailable: AtomicBool,
}

impl std::fmt::Debug for MemoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCache")
            .field("default_ttl", &self.default_ttl)
            .field("unavailable", &self.unavailable.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl MemoryCache {
    /// Creates a cache with the given default TTL.
    pub fn new(clock: Arc<dyn Clock>, default_ttl: Option<Duration>) -> Self {
        Self {
            default_ttl,
            slots: RwLock::new(Slots::default()),
            clock,
            unavailable: AtomicBool::new(false),
        }
    }

    /// Returns the default TTL.
    pub fn default_ttl(&self) -> Option<Duration> {
        self.default_ttl
    }

    /// Simulates an unreachable cache: every call fails while set.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Returns a copy of the entry under `key`, only if not expired.
    pub async fn entry(&self, key: &str) -> Option<CacheEntry> {
        let now = self.clock.now();
        self.slots
            .read()
            .await
            .entries
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .cloned()
    }

    /// Checks if a key exists and is not expired.
    pub async fn contains(&self, key: &str) -> bool {
        self.entry(key).await.is_some()
    }

    /// Returns the number of stored entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.slots.read().await.entries.len()
    }

    /// Returns true if the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.slots.read().await.entries.is_empty()
    }

    /// Clears all cache entries.
    pub async fn clear(&self) {
        let mut slots = self.slots.write().await;
        let entries = &mut slots.entries;
        let count = entries.len();
        entries.clear();
        debug!(count = count, "Cleared all cache entries");
    }

    /// Removes all expired entries.
    pub async fn evict_expired(&self) -> usize {
        let now = self.clock.now();
        let mut slots = self.slots.write().await;
        let entries = &mut slots.entries;
        let before = entries.len();
        entries.retain(|key, entry| {
            let keep = !entry.is_expired(now);
            if !keep {
                trace!(key = %key, "Evicting expired cache entry");
            }
            keep
        });
        let evicted = before - entries.len();
        if evicted > 0 {
            debug!(evicted = evicted, "Evicted expired cache entries");
        }
        evicted
    }

    /// Returns the time until the next entry expires.
    pub async fn next_expiry(&self) -> Option<Duration> {
        let now = self.clock.now();
        self.slots
            .read()
            .await
            .entries
            .values()
            .filter(|entry| !entry.is_expired(now))
            .filter_map(|entry| entry.time_until_expiry(now))
            .min()
    }

    fn check_available(&self) -> CacheResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(CacheError::Unavailable("memory cache is offline".to_string()))
        } else {
            Ok(())
        }
    }
}

impl AvailabilityCache for MemoryCache {
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, CacheResult<Option<Vec<u8>>>> {
        Box::pin(async move {
            self.check_available()?;
            Ok(self.entry(key).await.map(|entry| entry.value().to_vec()))
        })
    }

    fn set<'a>(
        &'a self,
        key: &'a str,
        value: Vec<u8>,
        ttl: Option<Duration>,
    ) -> BoxFuture<'a, CacheResult<()>> {
        Box::pin(async move {
            self.check_available()?;
            let ttl = ttl.or(self.default_ttl);
            let entry = CacheEntry::new(value, self.clock.now(), ttl);
            self.slots
                .write()
                .await
                .entries
                .insert(key.to_string(), entry);
            debug!(key = %key, ttl_secs = ttl.map(|t| t.as_secs()), "Stored cache entry");
            Ok(())
        })
    }

    fn invalidate<'a>(&'a self, key: &'a str) -> BoxFuture<'a, CacheResult<()>> {
        Box::pin(async move {
            self.check_available()?;
            let mut slots = self.slots.write().await;
            *slots.generations.entry(key.to_string()).or_insert(0) += 1;
            if slots.entries.remove(key).is_some() {
                debug!(key = %key, "Invalidated cache entry");
            }
            Ok(())
        })
    }

    fn generation<'a>(&'a self, key: &'a str) -> BoxFuture<'a, CacheResult<u64>> {
        Box::pin(async move {
            self.check_available()?;
            Ok(self.slots.read().await.generation(key))
        })
    }

    fn set_if_current<'a>(
        &'a self,
        key: &'a str,
        value: Vec<u8>,
        ttl: Option<Duration>,
        generation: u64,
    ) -> BoxFuture<'a, CacheResult<bool>> {
        Box::pin(async move {
            self.check_available()?;
            let mut slots = self.slots.write().await;
            let current = slots.generation(key);
            if current != generation {
                debug!(
                    key = %key,
                    expected = generation,
                    current = current,
                    "Discarding cache write for invalidated key"
                );
                return Ok(false);
            }
            let ttl = ttl.or(self.default_ttl);
            let entry = CacheEntry::new(value, self.clock.now(), ttl);
            slots.entries.insert(key.to_string(), entry);
            debug!(key = %key, ttl_secs = ttl.map(|t| t.as_secs()), "Stored cache entry");
            Ok(true)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotbook_core::FixedClock;

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn cache(ttl: Option<Duration>) -> (Arc<FixedClock>, MemoryCache) {
        let clock = Arc::new(FixedClock::new(start()));
        let cache = MemoryCache::new(clock.clone(), ttl);
        (clock, cache)
    }

    mod keys {
        use super::*;

        #[test]
        fn day_keys_match_external_format() {
            let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
            assert_eq!(
                CacheKey::day_availability("pa", date),
                "provider-day-availability:pa:20240310"
            );
            assert_eq!(
                CacheKey::day_appointments("pa", date),
                "provider-appointments:pa:20240310"
            );
        }

        #[test]
        fn month_key_is_zero_padded() {
            assert_eq!(
                CacheKey::month_availability("pa", 2024, 3),
                "provider-month-availability:pa:202403"
            );
        }

        #[test]
        fn affected_keys_cover_day_and_month_views() {
            let keys = CacheKey::affected_by("pa", start());
            assert_eq!(
                keys,
                [
                    "provider-day-availability:pa:20240301".to_string(),
                    "provider-appointments:pa:20240301".to_string(),
                    "provider-month-availability:pa:202403".to_string(),
                ]
            );
        }
    }

    mod memory {
        use super::*;

        #[tokio::test]
        async fn set_get_and_invalidate() {
            let (_, cache) = cache(None);
            cache.set("k", b"v".to_vec(), None).await.unwrap();
            assert_eq!(cache.get("k").await.unwrap(), Some(b"v".to_vec()));

            cache.invalidate("k").await.unwrap();
            assert_eq!(cache.get("k").await.unwrap(), None);
            // invalidating a missing key is not an error
            cache.invalidate("k").await.unwrap();
        }

        #[tokio::test]
        async fn set_replaces_whole_entry() {
            let (_, cache) = cache(None);
            cache.set("k", b"old".to_vec(), None).await.unwrap();
            cache.set("k", b"new".to_vec(), None).await.unwrap();
            assert_eq!(cache.get("k").await.unwrap(), Some(b"new".to_vec()));
            assert_eq!(cache.len().await, 1);
        }

        #[tokio::test]
        async fn entries_expire_on_cache_clock() {
            let (clock, cache) = cache(Some(Duration::from_secs(60)));
            cache.set("k", b"v".to_vec(), None).await.unwrap();

            clock.advance(chrono::Duration::seconds(59));
            assert!(cache.contains("k").await);

            clock.advance(chrono::Duration::seconds(1));
            assert!(!cache.contains("k").await);
            assert_eq!(cache.get("k").await.unwrap(), None);
        }

        #[tokio::test]
        async fn explicit_ttl_overrides_default() {
            let (clock, cache) = cache(Some(Duration::from_secs(60)));
            cache
                .set("long", b"v".to_vec(), Some(Duration::from_secs(600)))
                .await
                .unwrap();
            clock.advance(chrono::Duration::seconds(120));
            assert!(cache.contains("long").await);
        }

        #[tokio::test]
        async fn no_ttl_never_expires() {
            let (clock, cache) = cache(None);
            cache.set("k", b"v".to_vec(), None).await.unwrap();
            clock.advance(chrono::Duration::days(365));
            assert!(cache.contains("k").await);
            assert!(cache.next_expiry().await.is_none());
        }

        #[tokio::test]
        async fn evict_expired_removes_only_stale_entries() {
            let (clock, cache) = cache(Some(Duration::from_secs(60)));
            cache.set("short", b"v".to_vec(), None).await.unwrap();
            cache
                .set("long", b"v".to_vec(), Some(Duration::from_secs(600)))
                .await
                .unwrap();

            clock.advance(chrono::Duration::seconds(61));
            assert_eq!(cache.evict_expired().await, 1);
            assert_eq!(cache.len().await, 1);
            assert!(cache.contains("long").await);
        }

        #[tokio::test]
        async fn next_expiry_reports_soonest_entry() {
            let (_, cache) = cache(None);
            cache
                .set("a", b"v".to_vec(), Some(Duration::from_secs(600)))
                .await
                .unwrap();
            cache
                .set("b", b"v".to_vec(), Some(Duration::from_secs(30)))
                .await
                .unwrap();
            assert_eq!(cache.next_expiry().await, Some(Duration::from_secs(30)));
        }

        #[tokio::test]
        async fn clear_empties_cache() {
            let (_, cache) = cache(None);
            cache.set("a", b"v".to_vec(), None).await.unwrap();
            cache.set("b", b"v".to_vec(), None).await.unwrap();
            cache.clear().await;
            assert!(cache.is_empty().await);
        }

        #[tokio::test]
        async fn invalidate_bumps_generation() {
            let (_, cache) = cache(None);
            assert_eq!(cache.generation("k").await.unwrap(), 0);
            cache.invalidate("k").await.unwrap();
            cache.invalidate("k").await.unwrap();
            assert_eq!(cache.generation("k").await.unwrap(), 2);
            assert_eq!(cache.generation("other").await.unwrap(), 0);
        }

        #[tokio::test]
        async fn conditional_set_rejects_invalidated_key() {
            let (_, cache) = cache(None);
            let seen = cache.generation("k").await.unwrap();
            cache.invalidate("k").await.unwrap();

            let stored = cache
                .set_if_current("k", b"stale".to_vec(), None, seen)
                .await
                .unwrap();
            assert!(!stored);
            assert!(!cache.contains("k").await);

            let seen = cache.generation("k").await.unwrap();
            assert!(cache
                .set_if_current("k", b"fresh".to_vec(), None, seen)
                .await
                .unwrap());
            assert_eq!(cache.get("k").await.unwrap(), Some(b"fresh".to_vec()));
        }

        #[tokio::test]
        async fn plain_set_keeps_generation() {
            let (_, cache) = cache(None);
            cache.invalidate("k").await.unwrap();
            cache.set("k", b"v".to_vec(), None).await.unwrap();
            assert_eq!(cache.generation("k").await.unwrap(), 1);
        }

        #[tokio::test]
        async fn unavailable_cache_fails_every_call() {
            let (_, cache) = cache(None);
            cache.set("k", b"v".to_vec(), None).await.unwrap();
            cache.set_unavailable(true);

            assert!(matches!(cache.get("k").await, Err(CacheError::Unavailable(_))));
            assert!(cache.set("k", b"w".to_vec(), None).await.is_err());
            assert!(cache.invalidate("k").await.is_err());
            assert!(cache.generation("k").await.is_err());

            cache.set_unavailable(false);
            assert_eq!(cache.get("k").await.unwrap(), Some(b"v".to_vec()));
        }
    }
}
