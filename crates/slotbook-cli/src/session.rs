//! Engine wiring for a single CLI invocation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::debug;

use slotbook_core::{Clock, FixedClock, SystemClock};
use slotbook_engine::{BookingEngine, EngineConfig, MemoryCache};
use slotbook_store::{MemoryAppointmentStore, MemoryNotificationStore};

use crate::error::CliResult;
use crate::snapshot::Snapshot;

/// An engine over the state restored from a snapshot.
pub struct Session {
    data_path: PathBuf,
    store: Arc<MemoryAppointmentStore>,
    notifications: Arc<MemoryNotificationStore>,
    engine: BookingEngine,
}

impl Session {
    /// Restores state from `data_path`. `now` pins the clock when given.
    pub async fn open(
        data_path: &Path,
        config: &EngineConfig,
        now: Option<NaiveDateTime>,
    ) -> CliResult<Self> {
        let clock: Arc<dyn Clock> = match now {
            Some(now) => Arc::new(FixedClock::new(now)),
            None => Arc::new(SystemClock),
        };

        let snapshot = Snapshot::load(data_path).await?;
        debug!(
            appointments = snapshot.appointments.len(),
            notifications = snapshot.notifications.len(),
            "Restored snapshot"
        );

        let store = Arc::new(MemoryAppointmentStore::from_appointments(
            snapshot.appointments,
        )?);
        let notifications = Arc::new(MemoryNotificationStore::from_notifications(
            Arc::clone(&clock),
            snapshot.notifications,
        ));
        let cache = Arc::new(MemoryCache::new(
            Arc::clone(&clock),
            Some(config.cache_ttl()),
        ));
        let engine = BookingEngine::new(
            store.clone(),
            cache,
            notifications.clone(),
            clock,
            config,
        );

        Ok(Self {
            data_path: data_path.to_path_buf(),
            store,
            notifications,
            engine,
        })
    }

    pub fn engine(&self) -> &BookingEngine {
        &self.engine
    }

    pub fn notifications(&self) -> &MemoryNotificationStore {
        &self.notifications
    }

    /// Writes the current state back to the snapshot file.
    pub async fn persist(&self) -> CliResult<()> {
        let snapshot = Snapshot {
            appointments: self.store.snapshot().await,
            notifications: self.notifications.all().await,
        };
        snapshot.save(&self.data_path).await
    }
}
