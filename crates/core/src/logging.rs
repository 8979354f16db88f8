//! Centralized logging configuration.
//!
//! # Architecture
//!
//! - **LogConfig**: Thread-safe global configuration using atomic operations
//! - **LogLevel**: Hierarchical log levels (Off < Error < Warn < Info < Debug < Trace)
//! - **LogCategory**: Frontend-facing categories (Frontend, Video, Audio, Input, Core, State)
//! - **LogSink**: Where accepted messages go (stderr by default, a host log
//!   callback when running as a plugin)
//! - **log()**: Common logging function for all output
//!
//! Messages are built lazily: the closure passed to [`log`] only runs when the
//! category and level are enabled and the rate limiter lets it through.
//!
//! # Usage
//!
//! ```rust
//! use cytrus_core::logging::{log, LogCategory, LogLevel};
//!
//! log(LogCategory::Audio, LogLevel::Debug, || {
//!     format!("pulled {} frames", 512)
//! });
//! ```

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError, RwLock};
use std::time::{Duration, Instant};

/// Log level for controlling verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Off = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
    Trace = 5,
}

impl LogLevel {
    /// Parse log level from string (case-insensitive)
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "off" | "0" => Some(LogLevel::Off),
            "error" | "err" | "1" => Some(LogLevel::Error),
            "warn" | "warning" | "2" => Some(LogLevel::Warn),
            "info" | "3" => Some(LogLevel::Info),
            "debug" | "4" => Some(LogLevel::Debug),
            "trace" | "5" => Some(LogLevel::Trace),
            _ => None,
        }
    }

    fn from_u8(val: u8) -> Self {
        match val {
            1 => LogLevel::Error,
            2 => LogLevel::Warn,
            3 => LogLevel::Info,
            4 => LogLevel::Debug,
            5 => LogLevel::Trace,
            _ => LogLevel::Off,
        }
    }
}

/// Log category for different frontend concerns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogCategory {
    /// Lifecycle, settings, paths
    Frontend,
    /// Presentation and layout
    Video,
    /// Sink and sample transfer
    Audio,
    /// Host input polling and virtual devices
    Input,
    /// Messages originating inside the wrapped emulator
    Core,
    /// Save-state serialization
    State,
}

const CATEGORY_COUNT: usize = 6;

impl LogCategory {
    pub const ALL: [LogCategory; CATEGORY_COUNT] = [
        LogCategory::Frontend,
        LogCategory::Video,
        LogCategory::Audio,
        LogCategory::Input,
        LogCategory::Core,
        LogCategory::State,
    ];

    fn index(self) -> usize {
        match self {
            LogCategory::Frontend => 0,
            LogCategory::Video => 1,
            LogCategory::Audio => 2,
            LogCategory::Input => 3,
            LogCategory::Core => 4,
            LogCategory::State => 5,
        }
    }
}

/// Destination for accepted log messages.
pub trait LogSink: Send + Sync {
    fn write(&self, level: LogLevel, category: LogCategory, message: &str);
}

struct StderrSink;

impl LogSink for StderrSink {
    fn write(&self, _level: LogLevel, category: LogCategory, message: &str) {
        eprintln!("[{:?}] {}", category, message);
    }
}

/// Rate limiter for controlling log output frequency per category
///
/// Uses a sliding window algorithm to track log timestamps and enforce
/// a maximum rate of logs per second.
struct RateLimiter {
    max_logs_per_second: AtomicUsize,
    window_duration: Duration,
    state: Mutex<[WindowState; CATEGORY_COUNT]>,
}

#[derive(Default)]
struct WindowState {
    timestamps: VecDeque<Instant>,
    dropped: usize,
    last_drop_report: Option<Instant>,
}

impl RateLimiter {
    fn new(max_logs_per_second: usize) -> Self {
        Self {
            max_logs_per_second: AtomicUsize::new(max_logs_per_second),
            window_duration: Duration::from_secs(1),
            state: Mutex::new(Default::default()),
        }
    }

    fn set_max_logs_per_second(&self, max: usize) {
        self.max_logs_per_second.store(max, Ordering::Relaxed);
    }

    fn get_max_logs_per_second(&self) -> usize {
        self.max_logs_per_second.load(Ordering::Relaxed)
    }

    /// Check if a log should be allowed based on rate limits
    /// Returns (allowed, dropped_count) where dropped_count is Some(n) if we should report drops
    fn should_allow(&self, category: LogCategory) -> (bool, Option<usize>) {
        let now = Instant::now();
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let window = &mut state[category.index()];

        while let Some(&front) = window.timestamps.front() {
            if now.duration_since(front) > self.window_duration {
                window.timestamps.pop_front();
            } else {
                break;
            }
        }

        if window.timestamps.len() < self.get_max_logs_per_second() {
            window.timestamps.push_back(now);

            if window.dropped > 0 {
                let dropped = std::mem::take(&mut window.dropped);
                window.last_drop_report = Some(now);
                return (true, Some(dropped));
            }

            (true, None)
        } else {
            window.dropped += 1;

            // Report dropped messages once per second
            let should_report = match window.last_drop_report {
                None => true,
                Some(last) => now.duration_since(last) >= Duration::from_secs(1),
            };

            if should_report {
                let dropped = std::mem::take(&mut window.dropped);
                window.last_drop_report = Some(now);
                (false, Some(dropped))
            } else {
                (false, None)
            }
        }
    }
}

/// Global logging configuration
pub struct LogConfig {
    /// Global log level (applies to all categories unless overridden)
    global_level: AtomicU8,
    /// Per-category overrides; Off means "use the global level"
    category_levels: [AtomicU8; CATEGORY_COUNT],
    sink: RwLock<Option<Box<dyn LogSink>>>,
    rate_limiter: RateLimiter,
}

impl LogConfig {
    /// Create a new LogConfig with all logging disabled and default rate limit (60 logs/second)
    fn new() -> Self {
        Self {
            global_level: AtomicU8::new(LogLevel::Off as u8),
            category_levels: Default::default(),
            sink: RwLock::new(None),
            rate_limiter: RateLimiter::new(60),
        }
    }

    /// Get the global singleton instance
    pub fn global() -> &'static Self {
        use std::sync::OnceLock;
        static INSTANCE: OnceLock<LogConfig> = OnceLock::new();
        INSTANCE.get_or_init(LogConfig::new)
    }

    pub fn set_global_level(&self, level: LogLevel) {
        self.global_level.store(level as u8, Ordering::Relaxed);
    }

    pub fn get_global_level(&self) -> LogLevel {
        LogLevel::from_u8(self.global_level.load(Ordering::Relaxed))
    }

    pub fn set_level(&self, category: LogCategory, level: LogLevel) {
        self.category_levels[category.index()].store(level as u8, Ordering::Relaxed);
    }

    pub fn get_level(&self, category: LogCategory) -> LogLevel {
        LogLevel::from_u8(self.category_levels[category.index()].load(Ordering::Relaxed))
    }

    /// Check if a message should be logged for the given category and level
    ///
    /// Returns true if:
    /// 1. The category-specific level is set and >= the message level, OR
    /// 2. The category-specific level is Off AND the global level >= the message level
    pub fn should_log(&self, category: LogCategory, level: LogLevel) -> bool {
        if level == LogLevel::Off {
            return false;
        }
        let category_level = self.get_level(category);
        if category_level != LogLevel::Off {
            level <= category_level
        } else {
            level <= self.get_global_level()
        }
    }

    /// Most verbose level any category currently accepts.
    pub fn max_enabled_level(&self) -> LogLevel {
        LogCategory::ALL
            .iter()
            .map(|&c| self.get_level(c))
            .chain(std::iter::once(self.get_global_level()))
            .max()
            .unwrap_or(LogLevel::Off)
    }

    /// Reset all logging to Off
    pub fn reset(&self) {
        self.set_global_level(LogLevel::Off);
        for category in LogCategory::ALL {
            self.set_level(category, LogLevel::Off);
        }
    }

    /// Set the maximum logs per second per category (rate limit)
    pub fn set_rate_limit(&self, max_logs_per_second: usize) {
        self.rate_limiter.set_max_logs_per_second(max_logs_per_second);
    }

    pub fn get_rate_limit(&self) -> usize {
        self.rate_limiter.get_max_logs_per_second()
    }

    /// Route accepted messages to `sink` instead of stderr.
    pub fn set_sink(&self, sink: Box<dyn LogSink>) {
        *self.sink.write().unwrap_or_else(PoisonError::into_inner) = Some(sink);
    }

    /// Go back to stderr output.
    pub fn clear_sink(&self) {
        *self.sink.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn write_message(&self, level: LogLevel, category: LogCategory, message: &str) {
        let sink = self.sink.read().unwrap_or_else(PoisonError::into_inner);
        match sink.as_deref() {
            Some(sink) => sink.write(level, category, message),
            None => StderrSink.write(level, category, message),
        }
    }
}

/// Log a message with the specified category and level
///
/// This is the primary logging function used throughout the codebase.
/// The message is lazily evaluated via a closure, so formatting only occurs
/// when logging is actually enabled for the given category and level.
///
/// # Rate Limiting
///
/// At most `get_rate_limit()` messages per second per category are written.
/// When the limit is exceeded, logs are dropped and a summary message is
/// periodically emitted.
pub fn log<F>(category: LogCategory, level: LogLevel, message_fn: F)
where
    F: FnOnce() -> String,
{
    let config = LogConfig::global();
    if config.should_log(category, level) {
        let (allowed, dropped_count) = config.rate_limiter.should_allow(category);

        if let Some(count) = dropped_count {
            if count > 0 {
                let warning = format!("Rate limit exceeded, {} log message(s) dropped in the last second", count);
                config.write_message(LogLevel::Warn, category, &warning);
            }
        }

        if allowed {
            let message = message_fn();
            config.write_message(level, category, &message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("off"), Some(LogLevel::Off));
        assert_eq!(LogLevel::from_str("OFF"), Some(LogLevel::Off));
        assert_eq!(LogLevel::from_str("ERR"), Some(LogLevel::Error));
        assert_eq!(LogLevel::from_str("WARNING"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::from_str("3"), Some(LogLevel::Info));
        assert_eq!(LogLevel::from_str("debug"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::from_str("TRACE"), Some(LogLevel::Trace));
        assert_eq!(LogLevel::from_str("invalid"), None);
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Off < LogLevel::Error);
        assert!(LogLevel::Error < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Debug);
        assert!(LogLevel::Debug < LogLevel::Trace);
    }

    #[test]
    fn test_should_log_with_category_level() {
        let config = LogConfig::new();
        config.set_level(LogCategory::Audio, LogLevel::Info);

        assert!(config.should_log(LogCategory::Audio, LogLevel::Error));
        assert!(config.should_log(LogCategory::Audio, LogLevel::Info));
        assert!(!config.should_log(LogCategory::Audio, LogLevel::Debug));
    }

    #[test]
    fn test_category_level_overrides_global() {
        let config = LogConfig::new();
        config.set_global_level(LogLevel::Error);
        config.set_level(LogCategory::Video, LogLevel::Debug);

        assert!(config.should_log(LogCategory::Video, LogLevel::Debug));
        assert!(!config.should_log(LogCategory::Input, LogLevel::Warn));
        assert!(config.should_log(LogCategory::Input, LogLevel::Error));
    }

    #[test]
    fn test_off_messages_never_log() {
        let config = LogConfig::new();
        config.set_global_level(LogLevel::Trace);
        assert!(!config.should_log(LogCategory::Core, LogLevel::Off));
    }

    #[test]
    fn test_max_enabled_level() {
        let config = LogConfig::new();
        assert_eq!(config.max_enabled_level(), LogLevel::Off);
        config.set_global_level(LogLevel::Warn);
        config.set_level(LogCategory::State, LogLevel::Debug);
        assert_eq!(config.max_enabled_level(), LogLevel::Debug);
        config.reset();
        assert_eq!(config.max_enabled_level(), LogLevel::Off);
    }

    #[test]
    fn test_rate_limiter_blocks_over_limit() {
        let limiter = RateLimiter::new(60);
        for _ in 0..60 {
            let (allowed, _) = limiter.should_allow(LogCategory::Video);
            assert!(allowed, "Should allow logs within the rate limit");
        }
        let (allowed, _) = limiter.should_allow(LogCategory::Video);
        assert!(!allowed, "Should block logs exceeding the rate limit");

        // Other categories keep their own window
        let (allowed, _) = limiter.should_allow(LogCategory::Audio);
        assert!(allowed);
    }

    #[test]
    fn test_rate_limiter_sliding_window() {
        let limiter = RateLimiter::new(5);
        for _ in 0..5 {
            limiter.should_allow(LogCategory::Input);
        }
        for _ in 0..10 {
            limiter.should_allow(LogCategory::Input);
        }

        std::thread::sleep(Duration::from_millis(1100));

        let (allowed, dropped) = limiter.should_allow(LogCategory::Input);
        assert!(allowed, "Should allow logs after sliding window expires");
        let dropped = dropped.expect("Should report dropped count");
        assert!((9..=10).contains(&dropped), "got {}", dropped);
    }

    struct Capture(Arc<Mutex<Vec<(LogLevel, LogCategory, String)>>>);

    impl LogSink for Capture {
        fn write(&self, level: LogLevel, category: LogCategory, message: &str) {
            self.0.lock().unwrap().push((level, category, message.to_string()));
        }
    }

    #[test]
    fn test_sink_receives_messages() {
        let config = LogConfig::new();
        let captured = Arc::new(Mutex::new(Vec::new()));
        config.set_sink(Box::new(Capture(captured.clone())));
        config.write_message(LogLevel::Error, LogCategory::State, "boom");

        let captured = captured.lock().unwrap();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0], (LogLevel::Error, LogCategory::State, "boom".to_string()));
    }
}
