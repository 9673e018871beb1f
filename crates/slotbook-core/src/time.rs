//! Time types for slot booking.
//!
//! All instants are server-local wall-clock values ([`NaiveDateTime`]). A slot
//! is the one-hour interval starting at a truncated hour. This module provides
//! [`WorkingHours`] for the bookable range and [`SlotWindow`] for half-open
//! query ranges over days and months.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// First bookable hour of the day.
pub const DEFAULT_START_HOUR: u32 = 8;

/// Last bookable hour of the day (inclusive).
pub const DEFAULT_END_HOUR: u32 = 17;

/// Rounds an instant down to the start of its hour.
pub fn truncate_to_hour(dt: NaiveDateTime) -> NaiveDateTime {
    NaiveTime::from_hms_opt(dt.hour(), 0, 0)
        .map(|t| dt.date().and_time(t))
        .unwrap_or(dt)
}

/// Returns the start of the hour following `dt`.
pub fn next_hour_boundary(dt: NaiveDateTime) -> NaiveDateTime {
    truncate_to_hour(dt) + Duration::hours(1)
}

/// Returns the number of days in the given month, or `None` for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let window = SlotWindow::for_month(year, month)?;
    Some((window.end.date() - window.start.date()).num_days() as u32)
}

/// The bookable hours of a provider's day.
///
/// Both bounds are inclusive start hours: with the defaults a slot may start
/// at 08:00 and the last one at 17:00, giving ten slots per day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkingHours {
    /// First bookable start hour.
    pub start_hour: u32,
    /// Last bookable start hour (inclusive).
    pub end_hour: u32,
}

impl Default for WorkingHours {
    fn default() -> Self {
        Self {
            start_hour: DEFAULT_START_HOUR,
            end_hour: DEFAULT_END_HOUR,
        }
    }
}

impl WorkingHours {
    /// Creates a new working-hours range.
    pub fn new(start_hour: u32, end_hour: u32) -> Self {
        Self {
            start_hour,
            end_hour,
        }
    }

    /// Returns true if the range is ordered and fits inside a day.
    pub fn is_valid(&self) -> bool {
        self.start_hour <= self.end_hour && self.end_hour <= 23
    }

    /// Returns true if `hour` is a bookable start hour.
    pub fn contains(&self, hour: u32) -> bool {
        hour >= self.start_hour && hour <= self.end_hour
    }

    /// Iterates over every bookable start hour.
    pub fn hours(&self) -> impl Iterator<Item = u32> {
        self.start_hour..=self.end_hour
    }

    /// Maximum number of bookable slots in one day.
    pub fn slots_per_day(&self) -> usize {
        if self.start_hour > self.end_hour {
            0
        } else {
            (self.end_hour - self.start_hour + 1) as usize
        }
    }
}

/// A half-open range `[start, end)` of local instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotWindow {
    /// Start of the window (inclusive).
    pub start: NaiveDateTime,
    /// End of the window (exclusive).
    pub end: NaiveDateTime,
}

impl SlotWindow {
    /// Creates a window; returns `None` if `start` is after `end`.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// The window covering one calendar day.
    pub fn for_day(date: NaiveDate) -> Self {
        let start = date.and_time(NaiveTime::MIN);
        Self {
            start,
            end: start + Duration::days(1),
        }
    }

    /// The window covering one calendar month, or `None` for an invalid month.
    pub fn for_month(year: i32, month: u32) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)?
        };
        Some(Self {
            start: first.and_time(NaiveTime::MIN),
            end: next.and_time(NaiveTime::MIN),
        })
    }

    /// Checks if an instant falls within this window.
    pub fn contains(&self, dt: NaiveDateTime) -> bool {
        self.start <= dt && dt < self.end
    }

    /// Returns the duration of this window.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Returns the year and month this window starts in.
    pub fn year_month(&self) -> (i32, u32) {
        (self.start.year(), self.start.month())
    }
}
