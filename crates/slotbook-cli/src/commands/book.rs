//! The `book` command.

use chrono::NaiveDateTime;

use slotbook_core::Appointment;

use crate::error::CliResult;
use crate::session::Session;

/// Books a slot and prints the stored appointment.
pub async fn book(
    session: &Session,
    provider_id: &str,
    client_id: &str,
    date: NaiveDateTime,
    json: bool,
) -> CliResult<()> {
    let appointment = session
        .engine()
        .booking()
        .create_appointment(provider_id, client_id, date)
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&appointment)?);
    } else {
        println!("{}", render(&appointment));
    }
    Ok(())
}

fn render(appointment: &Appointment) -> String {
    format!(
        "Booked {} with {} for {} ({})",
        appointment.date.format("%Y-%m-%d %H:%M"),
        appointment.provider_id,
        appointment.client_id,
        appointment.id
    )
}
