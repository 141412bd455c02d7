//! Structured test logging with phase and duration tracking.
#![allow(dead_code)]
//!
//! Console-only logger for integration tests. Output is gated by the
//! `TEST_LOG_LEVEL` env var (trace, debug, info, warn, error; default
//! info) and each test records its phases and total duration.
//!
//! # Usage
//!
//! ```rust,ignore
//! let log = TestLogger::new("settlement_antenna_rule");
//! log.phase("setup");
//! // ...
//! log.phase("verify");
//! log.finish_ok();
//! ```

use std::env;
use std::fmt::Display;
use std::sync::Mutex;
use std::time::Instant;

/// Log severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn from_env() -> Self {
        match env::var("TEST_LOG_LEVEL")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "trace" => Self::Trace,
            "debug" => Self::Debug,
            "warn" | "warning" => Self::Warn,
            "error" | "err" => Self::Error,
            _ => Self::Info,
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        };
        write!(f, "{s}")
    }
}

/// Per-test logger with phase and duration tracking.
pub struct TestLogger {
    name: String,
    started: Instant,
    min_level: LogLevel,
    phase: Mutex<Option<String>>,
}

impl TestLogger {
    /// Create a logger for the named test and log its start.
    #[must_use]
    pub fn new(name: &str) -> Self {
        let logger = Self {
            name: name.to_string(),
            started: Instant::now(),
            min_level: LogLevel::from_env(),
            phase: Mutex::new(None),
        };
        logger.log(LogLevel::Debug, "start");
        logger
    }

    /// Enter a named phase (setup, execute, verify, ...).
    pub fn phase(&self, phase: &str) {
        *self.phase.lock().unwrap() = Some(phase.to_string());
        self.log(LogLevel::Debug, &format!("phase: {phase}"));
    }

    pub fn trace(&self, message: &str) {
        self.log(LogLevel::Trace, message);
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    /// Log successful completion with the elapsed duration.
    pub fn finish_ok(&self) {
        let elapsed = self.started.elapsed().as_millis();
        self.log(LogLevel::Info, &format!("ok ({elapsed}ms)"));
    }

    /// Log failed completion with a reason.
    pub fn finish_err(&self, reason: &str) {
        let elapsed = self.started.elapsed().as_millis();
        self.log(LogLevel::Error, &format!("FAILED ({elapsed}ms): {reason}"));
    }

    fn log(&self, level: LogLevel, message: &str) {
        if level < self.min_level {
            return;
        }
        let phase = self.phase.lock().unwrap();
        match phase.as_deref() {
            Some(phase) => eprintln!("[{level}] {}::{phase}: {message}", self.name),
            None => eprintln!("[{level}] {}: {message}", self.name),
        }
    }
}
