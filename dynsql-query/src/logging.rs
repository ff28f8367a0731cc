//! Logging setup for dynsql.
//!
//! Rendering is instrumented with `tracing`. A subscriber is only installed
//! when asked for through the environment:
//!
//! - `DYNSQL_DEBUG=true|1|yes` - enable debug logging
//! - `DYNSQL_LOG_LEVEL=trace|debug|info|warn|error` - set the level explicitly
//! - `DYNSQL_LOG_FORMAT=json|pretty|compact` - output format (default: json)
//!
//! ```rust,no_run
//! use dynsql_query::logging;
//!
//! logging::init();
//! ```
//!
//! Installing a subscriber requires the `tracing-subscriber` feature. Without
//! it, events go to whatever subscriber the application set up itself.

use std::env;
use std::sync::Once;
use std::sync::atomic::{AtomicBool, Ordering};

static INIT: Once = Once::new();
static DEBUG_REQUESTED: AtomicBool = AtomicBool::new(false);

const DEBUG_VAR: &str = "DYNSQL_DEBUG";
const LEVEL_VAR: &str = "DYNSQL_LOG_LEVEL";
const FORMAT_VAR: &str = "DYNSQL_LOG_FORMAT";

/// Check whether debug logging is on.
///
/// True after [`init_debug`], or when `DYNSQL_DEBUG` is set to "true", "1"
/// or "yes" (case-insensitive).
#[inline]
pub fn is_debug_enabled() -> bool {
    DEBUG_REQUESTED.load(Ordering::Relaxed)
        || env::var(DEBUG_VAR)
            .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
            .unwrap_or(false)
}

fn normalize_level(level: &str) -> Option<&'static str> {
    match level.to_lowercase().as_str() {
        "trace" => Some("trace"),
        "debug" => Some("debug"),
        "info" => Some("info"),
        "warn" => Some("warn"),
        "error" => Some("error"),
        _ => None,
    }
}

/// Get the log level from `DYNSQL_LOG_LEVEL`.
///
/// Falls back to "debug" when debug logging is on, otherwise "warn".
pub fn get_log_level() -> &'static str {
    let fallback = if is_debug_enabled() { "debug" } else { "warn" };
    env::var(LEVEL_VAR)
        .ok()
        .and_then(|level| normalize_level(&level))
        .unwrap_or(fallback)
}

/// Get the output format from `DYNSQL_LOG_FORMAT`. Defaults to "json".
pub fn get_log_format() -> &'static str {
    env::var(FORMAT_VAR)
        .map(|f| match f.to_lowercase().as_str() {
            "pretty" => "pretty",
            "compact" => "compact",
            _ => "json",
        })
        .unwrap_or("json")
}

/// Initialize logging from the environment. Subsequent calls are no-ops.
pub fn init() {
    if !is_debug_enabled() && env::var(LEVEL_VAR).is_err() {
        return;
    }
    install(get_log_level());
}

/// Initialize logging at `level`, ignoring `DYNSQL_LOG_LEVEL`.
///
/// An unknown level falls back to [`get_log_level`].
pub fn init_with_level(level: &str) {
    install(normalize_level(level).unwrap_or_else(get_log_level));
}

/// Initialize debug logging, as if `DYNSQL_DEBUG=true` were set.
pub fn init_debug() {
    DEBUG_REQUESTED.store(true, Ordering::Relaxed);
    install(get_log_level());
}

fn install(level: &'static str) {
    INIT.call_once(|| {
        #[cfg(feature = "tracing-subscriber")]
        {
            use tracing_subscriber::{EnvFilter, fmt, prelude::*};

            let filter = EnvFilter::try_new(format!("dynsql={},dynsql_query={}", level, level))
                .unwrap_or_else(|_| EnvFilter::new("warn"));

            let installed = match get_log_format() {
                "json" => tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().json())
                    .try_init(),
                "compact" => tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().compact())
                    .try_init(),
                _ => tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().pretty())
                    .try_init(),
            };

            if installed.is_ok() {
                tracing::info!(
                    level = level,
                    format = get_log_format(),
                    "dynsql logging initialized"
                );
            }
        }

        #[cfg(not(feature = "tracing-subscriber"))]
        let _ = level;
    });
}

/// Debug-level event, emitted only while `DYNSQL_DEBUG` is enabled.
#[macro_export]
macro_rules! dynsql_debug {
    ($($arg:tt)*) => {
        if $crate::logging::is_debug_enabled() {
            tracing::debug!($($arg)*);
        }
    };
}

/// Trace-level event, emitted only while `DYNSQL_DEBUG` is enabled.
#[macro_export]
macro_rules! dynsql_trace {
    ($($arg:tt)*) => {
        if $crate::logging::is_debug_enabled() {
            tracing::trace!($($arg)*);
        }
    };
}
