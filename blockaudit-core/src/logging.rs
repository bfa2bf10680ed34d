//! Structured logging using **tracing**.
//!
//! Library code emits `tracing` events directly (skipped fields, dropped raw
//! entries, per-page-type progress). The binary installs the subscriber and
//! uses the small helpers below for its own diagnostics.

use tracing::{info, warn};

/// Initializes the global tracing subscriber.
///
/// Call once at startup. Output is JSON on stderr so report output on stdout
/// stays clean for CSV consumers.
///
/// # Environment Variables
/// - `RUST_LOG`: Controls log filtering (e.g., `RUST_LOG=blockaudit_core=debug`)
pub fn init_structured_logging() {
    tracing_subscriber::fmt()
        .json()
        .with_ansi(false)
        .with_level(true)
        .with_target(true)
        .with_current_span(true)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

/// Logs an info event.
pub fn log_info(message: &str) {
    info!(detail = %message);
}

/// Logs a warning event.
pub fn log_warn(message: &str) {
    warn!(detail = %message);
}
