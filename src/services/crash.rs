//! Crash reporting and analytics interfaces
//!
//! The game only ever talks to these traits. The default implementations
//! write to the log and never take the process down, which is what a
//! development build wants.

use std::fmt;

/// Crash reporting backend
pub trait CrashReporter {
    /// Adds a breadcrumb to the next report
    fn log(&mut self, message: &str);

    /// Records a caught error as a non-fatal issue
    fn log_exception(&mut self, error: &dyn std::error::Error);

    /// Attaches a key/value pair to subsequent reports
    fn set_custom_key(&mut self, key: &str, value: &str);

    /// Terminates the process on a real backend
    fn force_crash(&mut self);
}

/// Value attached to an analytics event parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventValue {
    Int(i64),
    Float(f64),
}

impl fmt::Display for EventValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventValue::Int(v) => write!(f, "{}", v),
            EventValue::Float(v) => write!(f, "{}", v),
        }
    }
}

/// Analytics backend
pub trait Analytics {
    fn log_event(&mut self, name: &str, parameter: &str, value: EventValue);
}

/// Crash reporter that only logs
#[derive(Debug, Default)]
pub struct LoggingCrashReporter;

impl CrashReporter for LoggingCrashReporter {
    fn log(&mut self, message: &str) {
        tracing::info!(target: "crash_report", "{}", message);
    }

    fn log_exception(&mut self, error: &dyn std::error::Error) {
        tracing::warn!(target: "crash_report", %error, "non-fatal error recorded");
    }

    fn set_custom_key(&mut self, key: &str, value: &str) {
        tracing::info!(target: "crash_report", key, value, "custom key set");
    }

    fn force_crash(&mut self) {
        tracing::error!(
            target: "crash_report",
            "force_crash requested; skipping a real crash to avoid data loss"
        );
    }
}

/// Analytics sink that only logs
#[derive(Debug, Default)]
pub struct LoggingAnalytics;

impl Analytics for LoggingAnalytics {
    fn log_event(&mut self, name: &str, parameter: &str, value: EventValue) {
        tracing::info!(target: "analytics", event = name, parameter, %value, "event logged");
    }
}
