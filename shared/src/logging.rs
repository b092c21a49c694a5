//! Shared logging utilities for consistent tracing across the environment

use chrono::{DateTime, Utc};
use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Build the default filter directive for a base level
pub fn filter_directive(log_level: Option<&str>) -> String {
    let base_level = log_level.unwrap_or("info");
    format!("environment={base_level},kafkaenv={base_level},shared={base_level},reqwest=warn,hyper=warn")
}

/// Initialize the process-wide tracing subscriber
///
/// `RUST_LOG` takes precedence over `log_level` when set. Only the first
/// call has any effect; later calls (for example from several tests in the
/// same binary) are ignored.
pub fn init_tracing(log_level: Option<&str>) {
    INIT.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(filter_directive(log_level)));

        let _ = fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .try_init();
    });
}

/// Get formatted timestamp for consistent logging
pub fn format_timestamp() -> String {
    let now: DateTime<Utc> = Utc::now();
    now.format("%H:%M:%S%.3f").to_string()
}

/// Macro for service-aware info logging
#[macro_export]
macro_rules! service_info {
    ($service_id:expr, $($arg:tt)*) => {
        tracing::info!(
            service = %$service_id,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for service-aware warning logging
#[macro_export]
macro_rules! service_warn {
    ($service_id:expr, $($arg:tt)*) => {
        tracing::warn!(
            service = %$service_id,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for service-aware error logging
#[macro_export]
macro_rules! service_error {
    ($service_id:expr, $($arg:tt)*) => {
        tracing::error!(
            service = %$service_id,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for service-aware debug logging
#[macro_export]
macro_rules! service_debug {
    ($service_id:expr, $($arg:tt)*) => {
        tracing::debug!(
            service = %$service_id,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}
