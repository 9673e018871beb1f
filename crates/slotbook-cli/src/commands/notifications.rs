//! The `notifications` commands.

use std::fmt::Write;

use uuid::Uuid;

use slotbook_store::Notification;

use crate::error::{CliError, CliResult};
use crate::session::Session;

/// Lists a recipient's notifications, newest first.
pub async fn list(session: &Session, recipient_id: &str, unread: bool, json: bool) -> CliResult<()> {
    let notifications: Vec<_> = session
        .notifications()
        .for_recipient(recipient_id)
        .await
        .into_iter()
        .filter(|n| !unread || !n.read)
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&notifications)?);
    } else {
        print!("{}", render(&notifications));
    }
    Ok(())
}

/// Marks one notification as read.
pub async fn read(session: &Session, id: Uuid) -> CliResult<()> {
    if !session.notifications().mark_read(id).await {
        return Err(CliError::NotFound(format!("notification {id}")));
    }
    println!("Marked {id} as read.");
    Ok(())
}

fn render(notifications: &[Notification]) -> String {
    if notifications.is_empty() {
        return "No notifications\n".to_string();
    }
    let mut out = String::new();
    for n in notifications {
        let marker = if n.read { ' ' } else { '*' };
        let _ = writeln!(out, "{marker} {}  {}  {}", n.created_at.format("%Y-%m-%d %H:%M"), n.content, n.id);
    }
    out
}
