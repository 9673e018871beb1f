//! Booking orchestrator.
//!
//! [`BookingService::create_appointment`] runs the whole booking transaction:
//!
//! 1. look up the provider's slot at the truncated hour
//! 2. validate against the clock
//! 3. persist (the store's uniqueness constraint has the final word)
//! 4. invalidate every cached view of that provider's day and month
//! 5. notify the provider
//!
//! A rejection leaves no trace: nothing is written, invalidated or sent.
//! Once the appointment is stored the booking stands; cache and notification
//! failures after that point are logged, never returned.

use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::{error, info, warn};

use slotbook_core::{
    Appointment, BookingValidator, Clock, NewAppointment, NotificationFormat, RejectionReason,
    truncate_to_hour,
};
use slotbook_store::{AppointmentStore, Notifier};

use crate::cache::{AvailabilityCache, CacheKey};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};

/// Creates appointments.
pub struct BookingService {
    store: Arc<dyn AppointmentStore>,
    cache: Arc<dyn AvailabilityCache>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    validator: BookingValidator,
    format: NotificationFormat,
}

impl BookingService {
    /// Creates an orchestrator over the given collaborators.
    pub fn new(
        store: Arc<dyn AppointmentStore>,
        cache: Arc<dyn AvailabilityCache>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        config: &EngineConfig,
    ) -> Self {
        Self {
            store,
            cache,
            notifier,
            clock,
            validator: BookingValidator::new(config.working_hours),
            format: config.notifications.clone(),
        }
    }

    /// Books the hour containing `requested` with `provider_id` for `client_id`.
    ///
    /// # Errors
    ///
    /// [`EngineError::Rejected`] if a booking rule fails (including losing a
    /// race for the slot), [`EngineError::StoreUnavailable`] if the store fails.
    pub async fn create_appointment(
        &self,
        provider_id: &str,
        client_id: &str,
        requested: NaiveDateTime,
    ) -> EngineResult<Appointment> {
        let slot = truncate_to_hour(requested);
        let existing = self.store.find_by_exact_date(provider_id, slot).await?;

        let slot = self
            .validator
            .validate(provider_id, client_id, requested, self.clock.now(), existing.as_ref())
            .inspect_err(|reason| {
                info!(
                    provider_id = %provider_id,
                    client_id = %client_id,
                    slot = %slot,
                    reason = reason.code(),
                    "Booking rejected"
                );
            })?;

        let appointment = match self
            .store
            .create(NewAppointment::new(provider_id, client_id, slot))
            .await
        {
            Ok(appointment) => appointment,
            Err(e) if e.is_duplicate() => {
                info!(
                    provider_id = %provider_id,
                    slot = %slot,
                    "Slot taken by a concurrent booking"
                );
                return Err(RejectionReason::SlotTaken.into());
            }
            Err(e) => return Err(EngineError::StoreUnavailable(e)),
        };

        self.invalidate_views(&appointment).await;
        self.notify_provider(&appointment).await;

        info!(
            id = %appointment.id,
            provider_id = %appointment.provider_id,
            client_id = %appointment.client_id,
            date = %appointment.date,
            "Appointment booked"
        );
        Ok(appointment)
    }

    async fn invalidate_views(&self, appointment: &Appointment) {
        for key in CacheKey::affected_by(&appointment.provider_id, appointment.date) {
            if let Err(e) = self.cache.invalidate(&key).await {
                error!(
                    key = %key,
                    appointment_id = %appointment.id,
                    error = %e,
                    "Cache invalidation failed; availability view may be stale"
                );
            }
        }
    }

    async fn notify_provider(&self, appointment: &Appointment) {
        let content = self.format.booking_message(appointment.date);
        if let Err(e) = self.notifier.notify(&appointment.provider_id, content).await {
            warn!(
                recipient_id = %appointment.provider_id,
                appointment_id = %appointment.id,
                error = %e,
                "Booking notification not delivered"
            );
        }
    }
}
