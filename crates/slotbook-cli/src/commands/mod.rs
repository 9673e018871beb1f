//! Subcommand implementations.
//!
//! Each command prints to stdout. Rendering is split from the engine call so
//! the text layout can be tested without a session.

pub mod availability;
pub mod book;
pub mod config;
pub mod notifications;
