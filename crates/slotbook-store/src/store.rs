//! AppointmentStore trait definition.
//!
//! The [`AppointmentStore`] trait is the engine's view of the persistence
//! collaborator. Implementations must enforce the one-appointment-per-slot
//! constraint on `(provider_id, date)` inside [`AppointmentStore::create`]:
//! that check is the authoritative guard against two concurrent bookings of
//! the same hour.

use std::future::Future;
use std::pin::Pin;

use chrono::{NaiveDate, NaiveDateTime};
use slotbook_core::{Appointment, NewAppointment};

use crate::error::{StoreError, StoreErrorCode, StoreResult};

/// A boxed future for async trait methods.
///
/// Boxing keeps the trait object-safe so the engine can hold an
/// `Arc<dyn AppointmentStore>`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Durable collection of booked slots.
///
/// Queries return appointments ordered by date. No update or delete operation
/// is required.
pub trait AppointmentStore: Send + Sync {
    /// Returns the name of this store, for logs.
    fn name(&self) -> &str;

    /// Finds the appointment occupying `provider_id`'s slot at exactly `date`.
    fn find_by_exact_date<'a>(
        &'a self,
        provider_id: &'a str,
        date: NaiveDateTime,
    ) -> BoxFuture<'a, StoreResult<Option<Appointment>>>;

    /// Lists `provider_id`'s appointments on one calendar day.
    fn find_all_in_day<'a>(
        &'a self,
        provider_id: &'a str,
        date: NaiveDate,
    ) -> BoxFuture<'a, StoreResult<Vec<Appointment>>>;

    /// Lists `provider_id`'s appointments in one calendar month.
    ///
    /// # Errors
    ///
    /// Returns [`StoreErrorCode::InvalidData`] for an impossible month.
    fn find_all_in_month<'a>(
        &'a self,
        provider_id: &'a str,
        year: i32,
        month: u32,
    ) -> BoxFuture<'a, StoreResult<Vec<Appointment>>>;

    /// Assigns an identity to `appointment` and persists it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreErrorCode::Duplicate`] if the provider's slot is already
    /// occupied.
    fn create(&self, appointment: NewAppointment) -> BoxFuture<'_, StoreResult<Appointment>>;
}

/// A store that always fails.
///
/// Stands in for an unreachable database in tests.
#[derive(Debug)]
pub struct ErrorStore {
    code: StoreErrorCode,
    message: String,
}

impl ErrorStore {
    /// Creates a store failing every call with the given code and message.
    pub fn new(code: StoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Creates a store reporting itself unavailable.
    pub fn unavailable() -> Self {
        Self::new(StoreErrorCode::Unavailable, "store is unreachable")
    }

    fn error(&self) -> StoreError {
        StoreError::new(self.code, self.message.clone())
    }
}

impl AppointmentStore for ErrorStore {
    fn name(&self) -> &str {
        "error"
    }

    fn find_by_exact_date<'a>(
        &'a self,
        _provider_id: &'a str,
        _date: NaiveDateTime,
    ) -> BoxFuture<'a, StoreResult<Option<Appointment>>> {
        let error = self.error();
        Box::pin(async move { Err(error) })
    }

    fn find_all_in_day<'a>(
        &'a self,
        _provider_id: &'a str,
        _date: NaiveDate,
    ) -> BoxFuture<'a, StoreResult<Vec<Appointment>>> {
        let error = self.error();
        Box::pin(async move { Err(error) })
    }

    fn find_all_in_month<'a>(
        &'a self,
        _provider_id: &'a str,
        _year: i32,
        _month: u32,
    ) -> BoxFuture<'a, StoreResult<Vec<Appointment>>> {
        let error = self.error();
        Box::pin(async move { Err(error) })
    }

    fn create(&self, _appointment: NewAppointment) -> BoxFuture<'_, StoreResult<Appointment>> {
        let error = self.error();
        Box::pin(async move { Err(error) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    #[tokio::test]
    async fn error_store_fails_every_call() {
        let store = ErrorStore::unavailable();
        assert_eq!(store.name(), "error");

        let err = store.find_by_exact_date("pa", slot()).await.unwrap_err();
        assert_eq!(err.code(), StoreErrorCode::Unavailable);
        assert!(err.is_retryable());

        assert!(store.find_all_in_day("pa", slot().date()).await.is_err());
        assert!(store.find_all_in_month("pa", 2024, 3).await.is_err());
        assert!(
            store
                .create(NewAppointment::new("pa", "cb", slot()))
                .await
                .is_err()
        );
    }

    #[test]
    fn store_is_object_safe() {
        let store: Box<dyn AppointmentStore> = Box::new(ErrorStore::unavailable());
        assert_eq!(store.name(), "error");
    }
}
