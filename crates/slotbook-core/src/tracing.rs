//! Log output for the slotbook command line.
//!
//! Events are written to stderr as compact lines, keeping stdout free for
//! command output. `RUST_LOG` replaces the preset's directive when set.

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*, util::TryInitError};

/// Logging could not be installed.
#[derive(Debug, Error)]
#[error("failed to install log subscriber: {0}")]
pub struct TracingError(#[from] TryInitError);

/// Which events are shown and how much detail each line carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// Lowest level shown for slotbook crates.
    pub level: Level,
    /// Adds module path and source location to each line.
    pub verbose: bool,
}

impl TracingConfig {
    /// Warnings and errors only, bare messages.
    #[must_use]
    pub fn cli() -> Self {
        Self {
            level: Level::WARN,
            verbose: false,
        }
    }

    /// Everything down to debug, with source locations (`--debug`).
    #[must_use]
    pub fn cli_debug() -> Self {
        Self {
            level: Level::DEBUG,
            verbose: true,
        }
    }

    /// Filter used when `RUST_LOG` is unset: the level applies to every
    /// `slotbook_*` target and nothing else.
    pub fn directive(&self) -> String {
        format!("slotbook={}", self.level.as_str().to_ascii_lowercase())
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.directive()))
    }
}

/// Installs the global subscriber. Call once, before any command runs.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_tracing(config: TracingConfig) -> Result<(), TracingError> {
    let layer = fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(config.verbose)
        .with_file(config.verbose)
        .with_line_number(config.verbose);

    tracing_subscriber::registry()
        .with(config.env_filter())
        .with(layer)
        .try_init()?;
    Ok(())
}
