use log::{debug, info, warn};
use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize the logging system
/// This should be called once at application startup
pub fn init_logger() {
    INIT.call_once(|| {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info) // Default level
            .filter_module("anidex", log::LevelFilter::Debug)
            .filter_module("diesel", log::LevelFilter::Warn) // Reduce diesel noise
            .filter_module("r2d2", log::LevelFilter::Warn)
            .filter_module("tokio", log::LevelFilter::Warn)
            .format_timestamp_millis()
            .format_target(true)
            .format_module_path(false)
            .init();

        info!("Logging system initialized");
    });
}

/// Macro for structured logging with context
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        log::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        log::debug!($($arg)*)
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        log::warn!($($arg)*)
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        log::error!($($arg)*)
    };
}

/// Operations slower than this are logged at warn level
const SLOW_OPERATION_MS: u64 = 500;

/// Structured logging helpers for common patterns
pub struct LogContext;

impl LogContext {
    /// Log database operations
    pub fn db_operation(operation: &str, table: &str, duration_ms: Option<u64>) {
        match duration_ms {
            Some(duration) if duration >= SLOW_OPERATION_MS => warn!(
                "DB: {} on {} completed in {}ms (slow)",
                operation, table, duration
            ),
            Some(duration) => debug!("DB: {} on {} completed in {}ms", operation, table, duration),
            None => debug!("DB: Starting {} on {}", operation, table),
        }
    }

    /// Log a listing query and the size of its result
    pub fn list_operation(returned: usize, total_records: i64, duration_ms: u64) {
        debug!(
            "DB: list returned {} of {} matching anime in {}ms",
            returned, total_records, duration_ms
        );
    }

    /// Log performance metrics
    pub fn performance_metric(operation: &str, duration_ms: u64, additional_info: Option<&str>) {
        match additional_info {
            Some(info) => info!(
                "Performance: {} took {}ms ({})",
                operation, duration_ms, info
            ),
            None => info!("Performance: {} took {}ms", operation, duration_ms),
        }
    }
}

/// Helper for timing operations
pub struct TimedOperation {
    start: std::time::Instant,
    operation: &'static str,
    table: &'static str,
}

impl TimedOperation {
    pub fn new(operation: &'static str, table: &'static str) -> Self {
        LogContext::db_operation(operation, table, None);
        Self {
            start: std::time::Instant::now(),
            operation,
            table,
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    pub fn finish(self) -> u64 {
        let duration = self.elapsed_ms();
        LogContext::db_operation(self.operation, self.table, Some(duration));
        duration
    }
}
