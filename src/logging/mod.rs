//! Logging and observability
//!
//! Structured logging built on `tracing`:
//! - Human-readable console output on stderr
//! - Optional JSON log files with daily or hourly rotation
//! - `RUST_LOG` overrides the configured level
//!
//! # Example
//!
//! ```no_run
//! use oneroster::logging::init_logging;
//! use oneroster::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(resource = "enrollments", "Fetching collection");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log the start of a collection fetch
///
/// # Example
///
/// ```no_run
/// use oneroster::log_fetch_start;
/// use oneroster::adapters::oneroster::ResourceType;
///
/// log_fetch_start!(ResourceType::Enrollments, 100);
/// ```
#[macro_export]
macro_rules! log_fetch_start {
    ($resource:expr, $page_size:expr) => {
        tracing::info!(
            resource = %$resource,
            page_size = $page_size,
            "Fetching collection"
        );
    };
}

/// Log the completion of a collection fetch
///
/// # Example
///
/// ```no_run
/// use oneroster::log_fetch_complete;
/// use oneroster::adapters::oneroster::ResourceType;
/// use std::time::Duration;
///
/// log_fetch_complete!(ResourceType::Classes, 42, 1, Duration::from_millis(350));
/// ```
#[macro_export]
macro_rules! log_fetch_complete {
    ($resource:expr, $count:expr, $pages:expr, $duration:expr) => {
        tracing::info!(
            resource = %$resource,
            count = $count,
            pages = $pages,
            duration_ms = $duration.as_millis() as u64,
            "Collection fetched"
        );
    };
}

/// Log a retry attempt
///
/// # Example
///
/// ```no_run
/// use oneroster::log_retry_attempt;
///
/// log_retry_attempt!(2, 3, 1000u64, "HTTP error: 503 - unavailable");
/// ```
#[macro_export]
macro_rules! log_retry_attempt {
    ($attempt:expr, $max_retries:expr, $delay_ms:expr, $reason:expr) => {
        tracing::warn!(
            attempt = $attempt,
            max_retries = $max_retries,
            delay_ms = $delay_ms,
            reason = %$reason,
            "Request failed, retrying with exponential backoff"
        );
    };
}
