//! Slotbook booking engine.
//!
//! Wires the pure rules from `slotbook-core` to the storage and notification
//! ports from `slotbook-store`, adding a read-through availability cache:
//!
//! - [`AvailabilityService`] serves day and month views
//! - [`BookingService`] validates, persists and announces new appointments
//! - [`BookingEngine`] bundles both over one set of collaborators

pub mod availability;
pub mod booking;
pub mod cache;
pub mod config;
pub mod error;

use std::sync::Arc;

use slotbook_core::Clock;
use slotbook_store::{AppointmentStore, Notifier};

pub use availability::AvailabilityService;
pub use booking::BookingService;
pub use cache::{AvailabilityCache, CacheEntry, CacheError, CacheKey, CacheResult, MemoryCache};
pub use config::{CacheSettings, ConfigError, EngineConfig};
pub use error::{EngineError, EngineResult};

/// Both engine services sharing a store, cache and clock.
pub struct BookingEngine {
    availability: AvailabilityService,
    booking: BookingService,
}

impl BookingEngine {
    pub fn new(
        store: Arc<dyn AppointmentStore>,
        cache: Arc<dyn AvailabilityCache>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        config: &EngineConfig,
    ) -> Self {
        Self {
            availability: AvailabilityService::new(
                Arc::clone(&store),
                Arc::clone(&cache),
                Arc::clone(&clock),
                config,
            ),
            booking: BookingService::new(store, cache, notifier, clock, config),
        }
    }

    pub fn availability(&self) -> &AvailabilityService {
        &self.availability
    }

    pub fn booking(&self) -> &BookingService {
        &self.booking
    }
}
