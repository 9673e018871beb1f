//! Command-line front end for the slotbook booking engine.
//!
//! This crate provides the `slotbook` binary. State lives in a JSON snapshot
//! file that is loaded at start-up and written back after a booking.

pub mod cli;
pub mod commands;
pub mod error;
pub mod session;
pub mod snapshot;

pub use cli::Cli;
pub use error::{CliError, CliResult};
pub use session::Session;
pub use snapshot::Snapshot;
