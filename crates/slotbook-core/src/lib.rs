//! Core types: appointments, working hours, clock, validation, availability views

pub mod appointment;
pub mod availability;
pub mod clock;
pub mod format;
pub mod time;
pub mod tracing;
pub mod validate;

pub use appointment::{Appointment, AppointmentId, NewAppointment};
pub use availability::{
    DayAvailabilitySlot, MonthAvailabilityDay, compute_day_availability,
    compute_month_availability,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use format::{DEFAULT_DATE_FORMAT, DEFAULT_MESSAGE_PREFIX, FormatError, NotificationFormat};
pub use time::{SlotWindow, WorkingHours, days_in_month, next_hour_boundary, truncate_to_hour};
pub use tracing::{TracingConfig, TracingError, init_tracing};
pub use validate::{BookingValidator, RejectionReason};
