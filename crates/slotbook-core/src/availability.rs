//! Availability views.
//!
//! Pure derivations of a provider's free/busy time from the appointments that
//! fall on a day or in a month. The engine wraps these with caching.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::appointment::Appointment;
use crate::time::{WorkingHours, days_in_month};

/// Availability of one working hour on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAvailabilitySlot {
    /// Start hour of the slot (0-23).
    pub hour: u32,
    /// Whether the slot can still be booked.
    pub available: bool,
}

/// Availability of one calendar day in a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthAvailabilityDay {
    /// Day of the month (1-based).
    pub day: u32,
    /// Whether at least one working hour is still free.
    pub available: bool,
}

/// Computes the per-hour view of `date`.
///
/// A slot is available when nothing is booked at that exact hour and the
/// slot starts strictly after `now`. Elapsed hours are therefore reported as
/// unavailable even when free.
pub fn compute_day_availability(
    date: NaiveDate,
    appointments: &[Appointment],
    now: NaiveDateTime,
    working_hours: &WorkingHours,
) -> Vec<DayAvailabilitySlot> {
    working_hours
        .hours()
        .map(|hour| {
            let booked = appointments
                .iter()
                .any(|a| a.day() == date && a.hour() == hour);
            let upcoming = date
                .and_hms_opt(hour, 0, 0)
                .is_some_and(|start| start > now);
            DayAvailabilitySlot {
                hour,
                available: !booked && upcoming,
            }
        })
        .collect()
}

/// Computes the per-day view of a month.
///
/// A day is unavailable only once its booked count reaches the number of
/// slots per day. Returns `None` for an invalid month.
pub fn compute_month_availability(
    year: i32,
    month: u32,
    appointments: &[Appointment],
    working_hours: &WorkingHours,
) -> Option<Vec<MonthAvailabilityDay>> {
    let days = days_in_month(year, month)?;
    let capacity = working_hours.slots_per_day();

    let mut booked = vec![0usize; days as usize];
    for appt in appointments {
        let date = appt.day();
        if date.year() == year && date.month() == month {
            booked[date.day0() as usize] += 1;
        }
    }

    Some(
        booked
            .into_iter()
            .zip(1..=days)
            .map(|(count, day)| MonthAvailabilityDay {
                day,
                available: count < capacity,
            })
            .collect(),
    )
}
