//! Routing of log output to the host's log interface.

use std::ffi::CString;

use cytrus_core::logging::{log, LogCategory, LogConfig, LogLevel, LogSink};

use crate::ffi;

/// Forwards accepted messages to the host's `retro_log_printf_t`.
pub struct HostLogSink {
    printf: unsafe extern "C" fn(ffi::retro_log_level, *const std::ffi::c_char, ...),
}

impl HostLogSink {
    pub fn new(printf: ffi::retro_log_printf_t) -> Option<Self> {
        printf.map(|printf| Self { printf })
    }
}

pub fn host_level(level: LogLevel) -> ffi::retro_log_level {
    match level {
        LogLevel::Error => ffi::RETRO_LOG_ERROR,
        LogLevel::Warn => ffi::RETRO_LOG_WARN,
        LogLevel::Info => ffi::RETRO_LOG_INFO,
        LogLevel::Debug | LogLevel::Trace | LogLevel::Off => ffi::RETRO_LOG_DEBUG,
    }
}

impl LogSink for HostLogSink {
    fn write(&self, level: LogLevel, category: LogCategory, message: &str) {
        let line = format!("[{:?}] {}\n", category, message).replace('\0', " ");
        let Ok(line) = CString::new(line) else {
            return;
        };
        // The message goes through "%s" so stray format specifiers stay inert.
        unsafe { (self.printf)(host_level(level), c"%s".as_ptr(), line.as_ptr()) };
    }
}

/// Send all log output to the host, or back to stderr when it has no log
/// interface.
pub fn install(printf: ffi::retro_log_printf_t) {
    match HostLogSink::new(printf) {
        Some(sink) => LogConfig::global().set_sink(Box::new(sink)),
        None => LogConfig::global().clear_sink(),
    }
}

pub fn uninstall() {
    LogConfig::global().clear_sink();
}

/// `log` facade backend for records emitted by the wrapped emulator's crates.
struct LogBridge;

static LOG_BRIDGE: LogBridge = LogBridge;

fn from_log_level(level: log::Level) -> LogLevel {
    match level {
        log::Level::Error => LogLevel::Error,
        log::Level::Warn => LogLevel::Warn,
        log::Level::Info => LogLevel::Info,
        log::Level::Debug => LogLevel::Debug,
        log::Level::Trace => LogLevel::Trace,
    }
}

fn to_level_filter(level: LogLevel) -> log::LevelFilter {
    match level {
        LogLevel::Off => log::LevelFilter::Off,
        LogLevel::Error => log::LevelFilter::Error,
        LogLevel::Warn => log::LevelFilter::Warn,
        LogLevel::Info => log::LevelFilter::Info,
        LogLevel::Debug => log::LevelFilter::Debug,
        LogLevel::Trace => log::LevelFilter::Trace,
    }
}

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        LogConfig::global().should_log(LogCategory::Core, from_log_level(metadata.level()))
    }

    fn log(&self, record: &log::Record) {
        log(LogCategory::Core, from_log_level(record.level()), || {
            format!("{}: {}", record.target(), record.args())
        });
    }

    fn flush(&self) {}
}

/// Install the `log` bridge. Another logger already being set is not an error.
pub fn init_log_bridge() {
    if log::set_logger(&LOG_BRIDGE).is_ok() {
        log::set_max_level(to_level_filter(LogConfig::global().max_enabled_level()));
    }
}

/// Apply a level name from the settings file; unknown names keep the current level.
pub fn configure_level(name: &str) {
    let Some(level) = LogLevel::from_str(name) else {
        log(LogCategory::Frontend, LogLevel::Warn, || format!("Unknown log level '{}'", name));
        return;
    };
    let config = LogConfig::global();
    config.set_global_level(level);
    log::set_max_level(to_level_filter(config.max_enabled_level()));
}
