//! Booking notifications.
//!
//! The engine emits one notification per successful booking through the
//! [`Notifier`] trait. Delivery is fire-and-forget from the engine's point of
//! view: a failed delivery is logged, never surfaced to the booking caller.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use slotbook_core::{Clock, SystemClock};

use crate::error::NotifyError;
use crate::store::BoxFuture;

/// Delivery channel for user notifications.
pub trait Notifier: Send + Sync {
    /// Sends `content` to `recipient_id`.
    fn notify<'a>(
        &'a self,
        recipient_id: &'a str,
        content: String,
    ) -> BoxFuture<'a, Result<(), NotifyError>>;
}

/// A stored notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Unique identifier.
    pub id: Uuid,
    /// The user the notification is addressed to.
    pub recipient_id: String,
    /// Human-readable text.
    pub content: String,
    /// Whether the recipient has read it.
    pub read: bool,
    /// When it was recorded.
    pub created_at: NaiveDateTime,
}

/// [`Notifier`] that persists notifications in memory.
pub struct MemoryNotificationStore {
    notifications: RwLock<Vec<Notification>>,
    clock: Arc<dyn Clock>,
    unavailable: AtomicBool,
}

impl Default for MemoryNotificationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryNotificationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryNotificationStore")
            .field("unavailable", &self.unavailable.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl MemoryNotificationStore {
    /// Creates an empty store stamped by the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty store stamped by `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            notifications: RwLock::new(Vec::new()),
            clock,
            unavailable: AtomicBool::new(false),
        }
    }

    /// Restores previously recorded notifications.
    pub fn from_notifications(clock: Arc<dyn Clock>, notifications: Vec<Notification>) -> Self {
        Self {
            notifications: RwLock::new(notifications),
            clock,
            unavailable: AtomicBool::new(false),
        }
    }

    /// Makes every subsequent delivery fail (or succeed again).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Returns all notifications in delivery order.
    pub async fn all(&self) -> Vec<Notification> {
        self.notifications.read().await.clone()
    }

    /// Returns the notifications addressed to `recipient_id`, newest first.
    pub async fn for_recipient(&self, recipient_id: &str) -> Vec<Notification> {
        let guard = self.notifications.read().await;
        guard
            .iter()
            .rev()
            .filter(|n| n.recipient_id == recipient_id)
            .cloned()
            .collect()
    }

    /// Marks a notification as read. Returns false if it does not exist.
    pub async fn mark_read(&self, id: Uuid) -> bool {
        let mut guard = self.notifications.write().await;
        match guard.iter_mut().find(|n| n.id == id) {
            Some(n) => {
                n.read = true;
                true
            }
            None => false,
        }
    }
}

impl Notifier for MemoryNotificationStore {
    fn notify<'a>(
        &'a self,
        recipient_id: &'a str,
        content: String,
    ) -> BoxFuture<'a, Result<(), NotifyError>> {
        Box::pin(async move {
            if self.unavailable.load(Ordering::SeqCst) {
                return Err(NotifyError::Unavailable(
                    "notification store is offline".to_string(),
                ));
            }

            let notification = Notification {
                id: Uuid::new_v4(),
                recipient_id: recipient_id.to_string(),
                content,
                read: false,
                created_at: self.clock.now(),
            };
            debug!(recipient_id = %recipient_id, id = %notification.id, "Recorded notification");
            self.notifications.write().await.push(notification);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use slotbook_core::FixedClock;

    fn clock() -> Arc<FixedClock> {
        Arc::new(FixedClock::new(
            NaiveDate::from_ymd_opt(2024, 3, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        ))
    }

    #[tokio::test]
    async fn notify_records_unread_notification() {
        let clock = clock();
        let store = MemoryNotificationStore::with_clock(clock.clone());
        store.notify("pa", "hello".to_string()).await.unwrap();

        let all = store.all().await;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].recipient_id, "pa");
        assert_eq!(all[0].content, "hello");
        assert!(!all[0].read);
        assert_eq!(all[0].created_at, clock.now());
    }

    #[tokio::test]
    async fn for_recipient_filters_newest_first() {
        let store = MemoryNotificationStore::with_clock(clock());
        store.notify("pa", "first".to_string()).await.unwrap();
        store.notify("pb", "other".to_string()).await.unwrap();
        store.notify("pa", "second".to_string()).await.unwrap();

        let contents: Vec<_> = store
            .for_recipient("pa")
            .await
            .into_iter()
            .map(|n| n.content)
            .collect();
        assert_eq!(contents, vec!["second", "first"]);
    }

    #[tokio::test]
    async fn mark_read_flips_flag() {
        let store = MemoryNotificationStore::with_clock(clock());
        store.notify("pa", "hello".to_string()).await.unwrap();
        let id = store.all().await[0].id;

        assert!(store.mark_read(id).await);
        assert!(store.all().await[0].read);
        assert!(!store.mark_read(Uuid::new_v4()).await);
    }

    #[tokio::test]
    async fn unavailable_store_refuses_delivery() {
        let store = MemoryNotificationStore::with_clock(clock());
        store.set_unavailable(true);
        let err = store.notify("pa", "hello".to_string()).await.unwrap_err();
        assert!(matches!(err, NotifyError::Unavailable(_)));
        assert!(store.all().await.is_empty());
    }
}
