//! Persistence and notification ports for the booking engine.
//!
//! This crate provides the abstraction layer over the engine's external
//! collaborators:
//!
//! - [`AppointmentStore`] - durable collection of booked slots
//! - [`Notifier`] - delivery of booking notifications
//! - [`StoreError`] / [`NotifyError`] - failure types for those collaborators
//!
//! In-memory implementations ([`MemoryAppointmentStore`],
//! [`MemoryNotificationStore`]) serve as reference adapters and test fixtures.
//!
//! # Example
//!
//! ```ignore
//! use slotbook_store::{AppointmentStore, MemoryAppointmentStore};
//!
//! async fn booked_today(store: &dyn AppointmentStore, provider: &str, day: NaiveDate) -> usize {
//!     store.find_all_in_day(provider, day).await.map(|a| a.len()).unwrap_or(0)
//! }
//! ```

pub mod error;
pub mod memory;
pub mod notify;
pub mod store;

pub use error::{NotifyError, StoreError, StoreErrorCode, StoreResult};
pub use memory::MemoryAppointmentStore;
pub use notify::{MemoryNotificationStore, Notification, Notifier};
pub use store::{AppointmentStore, BoxFuture, ErrorStore};
