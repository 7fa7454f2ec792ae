//! Logging utilities for the Agendify application.
//!
//! This module provides a standardized approach to logging across all crates
//! in the Agendify application. It initializes the tracing subscriber once,
//! formatting log messages with timestamps, targets, and file/line
//! information.

use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber with the default INFO level.
///
/// # Examples
///
/// ```
/// use agendify_common::logging;
///
/// logging::init();
/// ```
pub fn init() {
    init_with_level(Level::INFO);
}

/// Initialize the tracing subscriber with a specific log level.
///
/// The level applies to the `agendify` crates; other targets stay under the
/// control of `RUST_LOG`. Safe to call more than once: later calls are no-ops
/// when a global subscriber is already set, which keeps test binaries quiet.
pub fn init_with_level(level: Level) {
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("agendify={}", level).parse().unwrap());

    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(filter)
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
}

/// Log an error with context at the ERROR level.
///
/// # Arguments
///
/// * `error` - The error to log.
/// * `context` - Additional context information about the error.
pub fn log_error<E: std::fmt::Display>(error: E, context: &str) {
    error!("{}: {}", context, error);
}
