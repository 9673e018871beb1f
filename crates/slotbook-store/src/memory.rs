//! In-memory appointment store.
//!
//! Appointments are keyed by `(provider_id, date)`, so the uniqueness check
//! and the insert happen under a single write lock.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use tokio::sync::RwLock;
use tracing::{debug, trace};

use slotbook_core::{Appointment, AppointmentId, NewAppointment, SlotWindow};

use crate::error::{StoreError, StoreResult};
use crate::store::{AppointmentStore, BoxFuture};

type SlotKey = (String, NaiveDateTime);

/// Reference [`AppointmentStore`] backed by a hash map.
#[derive(Debug, Default)]
pub struct MemoryAppointmentStore {
    appointments: RwLock<HashMap<SlotKey, Appointment>>,
}

impl MemoryAppointmentStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with existing appointments.
    ///
    /// # Errors
    ///
    /// Returns a duplicate error if two appointments share a provider slot.
    pub fn from_appointments(
        appointments: impl IntoIterator<Item = Appointment>,
    ) -> StoreResult<Self> {
        let mut map = HashMap::new();
        for appt in appointments {
            let key = (appt.provider_id.clone(), appt.date);
            if map.contains_key(&key) {
                return Err(StoreError::duplicate(format!(
                    "slot {}@{} appears twice",
                    appt.provider_id, appt.date
                )));
            }
            map.insert(key, appt);
        }
        Ok(Self {
            appointments: RwLock::new(map),
        })
    }

    /// Returns every stored appointment ordered by date.
    pub async fn snapshot(&self) -> Vec<Appointment> {
        let guard = self.appointments.read().await;
        sorted(guard.values().cloned())
    }

    /// Returns the number of stored appointments.
    pub async fn len(&self) -> usize {
        self.appointments.read().await.len()
    }

    /// Returns true if no appointments are stored.
    pub async fn is_empty(&self) -> bool {
        self.appointments.read().await.is_empty()
    }

    async fn collect_in(&self, provider_id: &str, window: SlotWindow) -> Vec<Appointment> {
        let guard = self.appointments.read().await;
        let matches = guard
            .values()
            .filter(|a| a.provider_id == provider_id && window.contains(a.date))
            .cloned();
        sorted(matches)
    }
}

fn sorted(appointments: impl Iterator<Item = Appointment>) -> Vec<Appointment> {
    let mut out: Vec<_> = appointments.collect();
    out.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.provider_id.cmp(&b.provider_id)));
    out
}

impl AppointmentStore for MemoryAppointmentStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn find_by_exact_date<'a>(
        &'a self,
        provider_id: &'a str,
        date: NaiveDateTime,
    ) -> BoxFuture<'a, StoreResult<Option<Appointment>>> {
        Box::pin(async move {
            let guard = self.appointments.read().await;
            Ok(guard.get(&(provider_id.to_string(), date)).cloned())
        })
    }

    fn find_all_in_day<'a>(
        &'a self,
        provider_id: &'a str,
        date: NaiveDate,
    ) -> BoxFuture<'a, StoreResult<Vec<Appointment>>> {
        Box::pin(async move {
            let found = self.collect_in(provider_id, SlotWindow::for_day(date)).await;
            trace!(provider_id = %provider_id, date = %date, count = found.len(), "Day query");
            Ok(found)
        })
    }

    fn find_all_in_month<'a>(
        &'a self,
        provider_id: &'a str,
        year: i32,
        month: u32,
    ) -> BoxFuture<'a, StoreResult<Vec<Appointment>>> {
        Box::pin(async move {
            let window = SlotWindow::for_month(year, month).ok_or_else(|| {
                StoreError::invalid_data(format!("invalid month {year}-{month:02}"))
            })?;
            let found = self.collect_in(provider_id, window).await;
            trace!(provider_id = %provider_id, year, month, count = found.len(), "Month query");
            Ok(found)
        })
    }

    fn create(&self, appointment: NewAppointment) -> BoxFuture<'_, StoreResult<Appointment>> {
        Box::pin(async move {
            let mut guard = self.appointments.write().await;
            let key = (appointment.provider_id.clone(), appointment.date);
            if guard.contains_key(&key) {
                return Err(StoreError::duplicate(format!(
                    "slot {}@{} is already booked",
                    key.0, key.1
                )));
            }

            let stored = Appointment::from_new(AppointmentId::new(), appointment);
            guard.insert(key, stored.clone());
            debug!(
                id = %stored.id,
                provider_id = %stored.provider_id,
                date = %stored.date,
                "Stored appointment"
            );
            Ok(stored)
        })
    }
}
