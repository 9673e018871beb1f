//! Availability calculator.
//!
//! Serves a provider's day and month views, cache-first. On a miss the view
//! is computed from the appointment store and written back. Reads never
//! invalidate; an unreachable or corrupt cache degrades to direct store
//! computation.
//!
//! The key's generation is read before the store is. The write-back is
//! conditional on it, so a view computed before a booking's invalidation is
//! dropped instead of cached.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use slotbook_core::{
    Appointment, Clock, DayAvailabilitySlot, MonthAvailabilityDay, WorkingHours,
    compute_day_availability, compute_month_availability, days_in_month,
};
use slotbook_store::AppointmentStore;

use crate::cache::{AvailabilityCache, CacheKey};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};

/// Computes and caches availability views.
pub struct AvailabilityService {
    store: Arc<dyn AppointmentStore>,
    cache: Arc<dyn AvailabilityCache>,
    clock: Arc<dyn Clock>,
    working_hours: WorkingHours,
    cache_ttl: Duration,
}

impl AvailabilityService {
    /// Creates a calculator over the given collaborators.
    pub fn new(
        store: Arc<dyn AppointmentStore>,
        cache: Arc<dyn AvailabilityCache>,
        clock: Arc<dyn Clock>,
        config: &EngineConfig,
    ) -> Self {
        Self {
            store,
            cache,
            clock,
            working_hours: config.working_hours,
            cache_ttl: config.cache_ttl(),
        }
    }

    /// Per-hour availability of `provider_id` on one day, one entry per
    /// working hour.
    pub async fn day_availability(
        &self,
        provider_id: &str,
        year: i32,
        month: u32,
        day: u32,
    ) -> EngineResult<Vec<DayAvailabilitySlot>> {
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| EngineError::invalid_date(year, month, day))?;
        let key = CacheKey::day_availability(provider_id, date);

        if let Some(view) = self.cached(&key).await {
            return Ok(view);
        }

        let generation = self.generation(&key).await;
        let appointments = self.appointments_on(provider_id, date).await?;
        let now = self.clock.now();
        let view = compute_day_availability(date, &appointments, now, &self.working_hours);
        self.write_back(&key, &view, self.day_view_ttl(date, now), generation)
            .await;
        Ok(view)
    }

    /// Per-day availability of `provider_id` over one month, one entry per
    /// calendar day.
    pub async fn month_availability(
        &self,
        provider_id: &str,
        year: i32,
        month: u32,
    ) -> EngineResult<Vec<MonthAvailabilityDay>> {
        if days_in_month(year, month).is_none() {
            return Err(EngineError::invalid_month(year, month));
        }
        let key = CacheKey::month_availability(provider_id, year, month);

        if let Some(view) = self.cached(&key).await {
            return Ok(view);
        }

        let generation = self.generation(&key).await;
        let appointments = self
            .store
            .find_all_in_month(provider_id, year, month)
            .await?;
        let view = compute_month_availability(year, month, &appointments, &self.working_hours)
            .ok_or_else(|| EngineError::invalid_month(year, month))?;
        self.write_back(&key, &view, self.cache_ttl, generation).await;
        Ok(view)
    }

    /// Appointments booked with `provider_id` on one day, ordered by hour.
    pub async fn provider_appointments(
        &self,
        provider_id: &str,
        year: i32,
        month: u32,
        day: u32,
    ) -> EngineResult<Vec<Appointment>> {
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| EngineError::invalid_date(year, month, day))?;
        self.appointments_on(provider_id, date).await
    }

    async fn appointments_on(
        &self,
        provider_id: &str,
        date: NaiveDate,
    ) -> EngineResult<Vec<Appointment>> {
        let key = CacheKey::day_appointments(provider_id, date);

        if let Some(list) = self.cached(&key).await {
            return Ok(list);
        }

        let generation = self.generation(&key).await;
        let list = self.store.find_all_in_day(provider_id, date).await?;
        self.write_back(&key, &list, self.cache_ttl, generation).await;
        Ok(list)
    }

    /// A day view flips whenever `now` reaches one of that day's slot starts,
    /// so its entry must not outlive the next one.
    fn day_view_ttl(&self, date: NaiveDate, now: NaiveDateTime) -> Duration {
        self.working_hours
            .hours()
            .filter_map(|hour| date.and_hms_opt(hour, 0, 0))
            .find(|start| *start > now)
            .and_then(|start| (start - now).to_std().ok())
            .map_or(self.cache_ttl, |until| until.min(self.cache_ttl))
    }

    async fn cached<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.cache.get(key).await {
            Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
                Ok(value) => {
                    debug!(key = %key, "Cache hit");
                    Some(value)
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "Discarding undecodable cache entry");
                    None
                }
            },
            Ok(None) => {
                debug!(key = %key, "Cache miss");
                None
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Cache read failed, computing from store");
                None
            }
        }
    }

    async fn generation(&self, key: &str) -> Option<u64> {
        match self.cache.generation(key).await {
            Ok(generation) => Some(generation),
            Err(e) => {
                debug!(key = %key, error = %e, "No cache generation, view will not be stored");
                None
            }
        }
    }

    async fn write_back<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
        generation: Option<u64>,
    ) {
        let Some(generation) = generation else {
            return;
        };
        let bytes = match serde_json::to_vec(value) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to encode view for cache");
                return;
            }
        };
        match self
            .cache
            .set_if_current(key, bytes, Some(ttl), generation)
            .await
        {
            Ok(true) => {}
            Ok(false) => debug!(key = %key, "View invalidated while computing, not cached"),
            Err(e) => warn!(key = %key, error = %e, "Cache write failed"),
        }
    }
}
