//! The `day`, `month` and `appointments` commands.

use std::fmt::Write;

use chrono::{Datelike, NaiveDate};

use slotbook_core::{Appointment, DayAvailabilitySlot, MonthAvailabilityDay};

use crate::error::CliResult;
use crate::session::Session;

/// Prints the hourly availability of one day.
pub async fn day(session: &Session, provider_id: &str, date: NaiveDate, json: bool) -> CliResult<()> {
    let slots = session
        .engine()
        .availability()
        .day_availability(provider_id, date.year(), date.month(), date.day())
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&slots)?);
    } else {
        print!("{}", render_day(&slots));
    }
    Ok(())
}

/// Prints the daily availability of one month.
pub async fn month(
    session: &Session,
    provider_id: &str,
    year: i32,
    month: u32,
    json: bool,
) -> CliResult<()> {
    let days = session
        .engine()
        .availability()
        .month_availability(provider_id, year, month)
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&days)?);
    } else {
        print!("{}", render_month(&days));
    }
    Ok(())
}

/// Prints the appointments booked with a provider on one day.
pub async fn appointments(
    session: &Session,
    provider_id: &str,
    date: NaiveDate,
    json: bool,
) -> CliResult<()> {
    let appointments = session
        .engine()
        .availability()
        .provider_appointments(provider_id, date.year(), date.month(), date.day())
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&appointments)?);
    } else {
        print!("{}", render_appointments(&appointments));
    }
    Ok(())
}

fn availability_label(available: bool) -> &'static str {
    if available { "free" } else { "busy" }
}

fn render_day(slots: &[DayAvailabilitySlot]) -> String {
    let mut out = String::new();
    for slot in slots {
        let _ = writeln!(out, "{:02}:00  {}", slot.hour, availability_label(slot.available));
    }
    out
}

fn render_month(days: &[MonthAvailabilityDay]) -> String {
    let mut out = String::new();
    for day in days {
        let _ = writeln!(out, "{:>2}  {}", day.day, availability_label(day.available));
    }
    out
}

fn render_appointments(appointments: &[Appointment]) -> String {
    if appointments.is_empty() {
        return "No appointments\n".to_string();
    }
    let mut out = String::new();
    for appt in appointments {
        let _ = writeln!(out, "{}  {}", appt.date.format("%H:%M"), appt.client_id);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotbook_core::{AppointmentId, NewAppointment};

    #[test]
    fn day_table() {
        let slots = [
            DayAvailabilitySlot { hour: 8, available: false },
            DayAvailabilitySlot { hour: 9, available: true },
        ];
        insta::assert_snapshot!(render_day(&slots), @r"
        08:00  busy
        09:00  free
        ");
    }

    #[test]
    fn month_table() {
        let days = [
            MonthAvailabilityDay { day: 9, available: true },
            MonthAvailabilityDay { day: 10, available: false },
        ];
        assert_eq!(render_month(&days), " 9  free\n10  busy\n");
    }

    #[test]
    fn appointment_list() {
        assert_eq!(render_appointments(&[]), "No appointments\n");

        let date = NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(14, 0, 0)
            .unwrap();
        let appt = Appointment::from_new(AppointmentId::new(), NewAppointment::new("pa", "cb", date));
        assert_eq!(render_appointments(&[appt]), "14:00  cb\n");
    }
}
