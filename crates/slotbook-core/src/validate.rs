//! Booking validation.
//!
//! [`BookingValidator`] is a pure decision function: given a requested slot,
//! the current time and whatever already occupies that slot, it either
//! accepts the truncated hour or names the first rule that failed.
//!
//! Rules are checked in a fixed order so the reported reason is deterministic:
//!
//! 1. the slot is already booked
//! 2. the slot is in the past
//! 3. the client is the provider
//! 4. the hour is outside working hours

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::appointment::Appointment;
use crate::time::{WorkingHours, truncate_to_hour};

/// Why a booking request was refused.
///
/// All reasons are user-facing and cannot succeed on retry without changing
/// the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    /// Another appointment already occupies the provider's slot.
    #[error("{}", self.message())]
    SlotTaken,
    /// The requested hour started before now.
    #[error("{}", self.message())]
    PastDate,
    /// The client asked to book with themselves.
    #[error("{}", self.message())]
    SelfBooking,
    /// The requested hour is not a working hour.
    #[error("{}", self.message())]
    OutsideWorkingHours,
}

impl RejectionReason {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::SlotTaken => "slot_taken",
            Self::PastDate => "past_date",
            Self::SelfBooking => "self_booking",
            Self::OutsideWorkingHours => "outside_working_hours",
        }
    }

    /// Stable human-readable message.
    pub fn message(&self) -> &'static str {
        match self {
            Self::SlotTaken => "This appointment is already booked",
            Self::PastDate => "You can't book an appointment in a past date",
            Self::SelfBooking => "You can't book an appointment with yourself",
            Self::OutsideWorkingHours => "You can only book an appointment during working hours",
        }
    }
}

/// Applies the booking rules for a provider's working hours.
#[derive(Debug, Clone, Copy, Default)]
pub struct BookingValidator {
    working_hours: WorkingHours,
}

impl BookingValidator {
    /// Creates a validator for the given working hours.
    pub fn new(working_hours: WorkingHours) -> Self {
        Self { working_hours }
    }

    /// Returns the working hours enforced by this validator.
    pub fn working_hours(&self) -> WorkingHours {
        self.working_hours
    }

    /// Validates a booking request.
    ///
    /// `existing` is the appointment currently stored at the provider's
    /// truncated hour, if any. On success returns the truncated hour that
    /// must be persisted.
    pub fn validate(
        &self,
        provider_id: &str,
        client_id: &str,
        requested: NaiveDateTime,
        now: NaiveDateTime,
        existing: Option<&Appointment>,
    ) -> Result<NaiveDateTime, RejectionReason> {
        let slot = truncate_to_hour(requested);

        if existing.is_some() {
            return Err(RejectionReason::SlotTaken);
        }

        if slot < now {
            return Err(RejectionReason::PastDate);
        }

        if client_id == provider_id {
            return Err(RejectionReason::SelfBooking);
        }

        if !self.working_hours.contains(slot.hour()) {
            return Err(RejectionReason::OutsideWorkingHours);
        }

        Ok(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appointment::{AppointmentId, NewAppointment};
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn booked(provider: &str, date: NaiveDateTime) -> Appointment {
        Appointment::from_new(AppointmentId::new(), NewAppointment::new(provider, "cb", date))
    }

    fn now() -> NaiveDateTime {
        at(2024, 3, 1, 0, 0)
    }

    #[test]
    fn accepts_free_future_working_hour() {
        let validator = BookingValidator::default();
        let slot = validator
            .validate("pa", "cb", at(2024, 3, 10, 9, 0), now(), None)
            .unwrap();
        assert_eq!(slot, at(2024, 3, 10, 9, 0));
    }

    #[test]
    fn accepted_slot_is_truncated() {
        let validator = BookingValidator::default();
        let slot = validator
            .validate("pa", "cb", at(2024, 3, 10, 9, 45), now(), None)
            .unwrap();
        assert_eq!(slot, at(2024, 3, 10, 9, 0));
    }

    #[test]
    fn taken_slot_wins_over_every_other_rule() {
        let validator = BookingValidator::default();
        let existing = booked("pa", at(2024, 2, 1, 7, 0));
        // past, self-booking and outside hours all apply too
        let result = validator.validate("pa", "pa", at(2024, 2, 1, 7, 0), now(), Some(&existing));
        assert_eq!(result, Err(RejectionReason::SlotTaken));
    }

    #[test]
    fn past_date_wins_over_self_booking_and_hours() {
        let validator = BookingValidator::default();
        let result = validator.validate("pa", "pa", at(2024, 2, 1, 7, 0), now(), None);
        assert_eq!(result, Err(RejectionReason::PastDate));
    }

    #[test]
    fn past_check_uses_truncated_hour() {
        let validator = BookingValidator::default();
        // 10:30 truncates to 10:00 which is before 10:15
        let result = validator.validate(
            "pa",
            "cb",
            at(2024, 3, 10, 10, 30),
            at(2024, 3, 10, 10, 15),
            None,
        );
        assert_eq!(result, Err(RejectionReason::PastDate));
    }

    #[test]
    fn slot_starting_exactly_now_is_accepted() {
        let validator = BookingValidator::default();
        let result = validator.validate(
            "pa",
            "cb",
            at(2024, 3, 10, 10, 0),
            at(2024, 3, 10, 10, 0),
            None,
        );
        assert_eq!(result, Ok(at(2024, 3, 10, 10, 0)));
    }

    #[test]
    fn self_booking_is_rejected() {
        let validator = BookingValidator::default();
        let result = validator.validate("pa", "pa", at(2024, 3, 10, 9, 0), now(), None);
        assert_eq!(result, Err(RejectionReason::SelfBooking));
    }

    #[test]
    fn hours_outside_range_are_rejected() {
        let validator = BookingValidator::default();
        for hour in (0..8).chain(18..24) {
            let result = validator.validate("pa", "cb", at(2024, 3, 10, hour, 0), now(), None);
            assert_eq!(result, Err(RejectionReason::OutsideWorkingHours), "hour {hour}");
        }
    }

    #[test]
    fn boundary_hours_are_accepted() {
        let validator = BookingValidator::default();
        assert!(validator.validate("pa", "cb", at(2024, 3, 10, 8, 0), now(), None).is_ok());
        assert!(validator.validate("pa", "cb", at(2024, 3, 10, 17, 59), now(), None).is_ok());
    }

    #[test]
    fn custom_working_hours_are_enforced() {
        let validator = BookingValidator::new(WorkingHours::new(10, 12));
        assert_eq!(
            validator.validate("pa", "cb", at(2024, 3, 10, 9, 0), now(), None),
            Err(RejectionReason::OutsideWorkingHours)
        );
        assert!(validator.validate("pa", "cb", at(2024, 3, 10, 12, 0), now(), None).is_ok());
    }

    #[test]
    fn reason_codes_are_stable() {
        assert_eq!(RejectionReason::SlotTaken.code(), "slot_taken");
        assert_eq!(RejectionReason::PastDate.code(), "past_date");
        assert_eq!(RejectionReason::SelfBooking.code(), "self_booking");
        assert_eq!(
            RejectionReason::OutsideWorkingHours.code(),
            "outside_working_hours"
        );
    }

    #[test]
    fn display_matches_message() {
        for reason in [
            RejectionReason::SlotTaken,
            RejectionReason::PastDate,
            RejectionReason::SelfBooking,
            RejectionReason::OutsideWorkingHours,
        ] {
            assert_eq!(reason.to_string(), reason.message());
        }
        insta::assert_snapshot!(RejectionReason::SlotTaken.message(), @"This appointment is already booked");
    }

    #[test]
    fn reason_serializes_as_code() {
        let json = serde_json::to_string(&RejectionReason::OutsideWorkingHours).unwrap();
        assert_eq!(json, "\"outside_working_hours\"");
    }
}
