//! Appointment records.
//!
//! An [`Appointment`] is one booked hour between a provider and a client. It is
//! immutable once stored; the store assigns its [`AppointmentId`].

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque unique identifier of an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppointmentId(Uuid);

impl AppointmentId {
    /// Generates a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AppointmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AppointmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A booked one-hour slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    /// Identity assigned at creation.
    pub id: AppointmentId,
    /// The user providing the service.
    pub provider_id: String,
    /// The user who booked the slot.
    pub client_id: String,
    /// Start of the booked hour.
    pub date: NaiveDateTime,
}

impl Appointment {
    /// Materializes a request into a stored record with the given identity.
    pub fn from_new(id: AppointmentId, new: NewAppointment) -> Self {
        Self {
            id,
            provider_id: new.provider_id,
            client_id: new.client_id,
            date: new.date,
        }
    }

    /// Hour of day of the booked slot.
    pub fn hour(&self) -> u32 {
        self.date.hour()
    }

    /// Calendar day of the booked slot.
    pub fn day(&self) -> NaiveDate {
        self.date.date()
    }

    /// Returns true if this appointment occupies the given provider's slot.
    pub fn occupies(&self, provider_id: &str, slot: NaiveDateTime) -> bool {
        self.provider_id == provider_id && self.date == slot
    }
}

/// A validated booking waiting to be persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAppointment {
    /// The user providing the service.
    pub provider_id: String,
    /// The user booking the slot.
    pub client_id: String,
    /// Start of the booked hour (already truncated).
    pub date: NaiveDateTime,
}

impl NewAppointment {
    /// Creates a new booking request.
    pub fn new(
        provider_id: impl Into<String>,
        client_id: impl Into<String>,
        date: NaiveDateTime,
    ) -> Self {
        Self {
            provider_id: provider_id.into(),
            client_id: client_id.into(),
            date,
        }
    }
}
