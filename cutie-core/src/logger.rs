//! Bridges the `log` facade to a logger supplied by the host app.

use std::sync::{Arc, OnceLock};

/// Receives log records emitted by the SDK.
///
/// Implemented by the host app so SDK diagnostics end up in its own logging
/// pipeline (`os_log`, `Logcat`, a file, ...).
///
/// ## Swift
///
/// ```swift
/// final class CutieLoggerBridge: Cutie.Logger {
///     func log(level: Cutie.LogLevel, message: String) {
///         os_log("%{public}@", log: .cutie, type: level.osLogType, message)
///     }
/// }
///
/// Cutie.setLogger(logger: CutieLoggerBridge())
/// ```
#[uniffi::export(with_foreign)]
pub trait Logger: Sync + Send {
    /// Logs a message at the specified log level.
    fn log(&self, level: LogLevel, message: String);
}

/// Severity of a forwarded log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum LogLevel {
    /// Very detailed tracing.
    Trace,
    /// Debugging information.
    Debug,
    /// Progress of the SDK (registration, attestation).
    Info,
    /// Recoverable problems, such as a pin set nearing expiry.
    Warn,
    /// Failures that were surfaced to the caller.
    Error,
}

/// Bridges the `log` facade to the foreign `Logger`.
struct ForeignLogger;

impl log::Log for ForeignLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        // Debug and trace noise from dependencies (hyper, rustls) is dropped.
        if !should_forward(record.level(), record.module_path()) {
            return;
        }

        if let Some(logger) = LOGGER_INSTANCE.get() {
            let level = log_level(record.level());
            let message = format!("{}", record.args());
            logger.log(level, message);
        } else {
            eprintln!("Logger not set: {}", record.args());
        }
    }

    fn flush(&self) {}
}

fn should_forward(level: log::Level, module_path: Option<&str>) -> bool {
    let is_from_cutie = module_path.is_some_and(|path| path.starts_with("cutie"));
    let is_debug_or_trace = level == log::Level::Debug || level == log::Level::Trace;
    is_from_cutie || !is_debug_or_trace
}

const fn log_level(level: log::Level) -> LogLevel {
    match level {
        log::Level::Error => LogLevel::Error,
        log::Level::Warn => LogLevel::Warn,
        log::Level::Info => LogLevel::Info,
        log::Level::Debug => LogLevel::Debug,
        log::Level::Trace => LogLevel::Trace,
    }
}

static LOGGER_INSTANCE: OnceLock<Arc<dyn Logger>> = OnceLock::new();

/// Sets the global logger.
///
/// Call once, early in app start-up. Later calls are ignored.
#[uniffi::export]
pub fn set_logger(logger: Arc<dyn Logger>) {
    if LOGGER_INSTANCE.set(logger).is_err() {
        eprintln!("Logger already set");
        return;
    }

    if let Err(e) = init_logger() {
        eprintln!("Failed to set logger: {e}");
    }
}

fn init_logger() -> Result<(), log::SetLoggerError> {
    static LOGGER: ForeignLogger = ForeignLogger;
    log::set_logger(&LOGGER)?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}
