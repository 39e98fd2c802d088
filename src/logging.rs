//! Logging and tracing configuration
//!
//! Diagnostics go to stderr so the case report on stdout stays clean.

use crate::config::LOG_VAR;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `E2E_LOG` is unset or invalid. Progress lines stay quiet.
const DEFAULT_FILTER: &str = "warn";

/// Initialize tracing for the harness.
///
/// Controlled by `E2E_LOG`; defaults to WARN so a plain run prints only the
/// case report.
pub fn init() {
    let filter =
        EnvFilter::try_from_env(LOG_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time()
                .compact(),
        )
        .init();
}
