use std::time::{Duration, Instant};

use crate::error::Result;
use crate::method::PropertyMethod;
use crate::value::Value;

use super::{Invocation, Middleware, Next};

/// Log level for [`Logged`] and [`Timed`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    #[default]
    Debug,
    Info,
    Warn,
    Error,
}

/// Log `msg` for a proxy method at the given level using `tracing`.
pub fn log_at_level(level: LogLevel, method: &PropertyMethod, msg: &str) {
    let interface = method.interface();
    let name = method.name();
    let property = method.property_name().unwrap_or_default();
    match level {
        LogLevel::Trace => tracing::trace!(interface, method = name, property, "{}", msg),
        LogLevel::Debug => tracing::debug!(interface, method = name, property, "{}", msg),
        LogLevel::Info => tracing::info!(interface, method = name, property, "{}", msg),
        LogLevel::Warn => tracing::warn!(interface, method = name, property, "{}", msg),
        LogLevel::Error => tracing::error!(interface, method = name, property, "{}", msg),
    }
}

// ---------------------------------------------------------------------------
// Logged
// ---------------------------------------------------------------------------

/// Logs every proxy call before and after it runs the rest of the chain.
///
/// Failures are logged with the error message, resolved values never are.
#[derive(Debug, Clone, Copy, Default)]
pub struct Logged {
    pub level: LogLevel,
}

impl Logged {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(level: LogLevel) -> Self {
        Logged { level }
    }
}

impl Middleware for Logged {
    fn handle(&self, next: Next<'_>, invocation: &Invocation<'_>) -> Result<Value> {
        let method = invocation.method();
        log_at_level(self.level, method, "resolving");
        let result = next.run(invocation);
        match &result {
            Ok(value) => log_at_level(self.level, method, &format!("resolved to {}", value.type_name())),
            Err(e) => log_at_level(self.level, method, &format!("failed: {e}")),
        }
        result
    }
}

// ---------------------------------------------------------------------------
// Timed
// ---------------------------------------------------------------------------

/// Logs how long proxy calls take.
///
/// With a threshold only calls slower than it are logged, at `Warn` unless
/// another level is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct Timed {
    pub level: LogLevel,
    pub threshold: Option<Duration>,
}

impl Timed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slower_than(threshold: Duration) -> Self {
        Timed {
            level: LogLevel::Warn,
            threshold: Some(threshold),
        }
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }
}

impl Middleware for Timed {
    fn handle(&self, next: Next<'_>, invocation: &Invocation<'_>) -> Result<Value> {
        let start = Instant::now();
        let result = next.run(invocation);
        let elapsed = start.elapsed();
        if self.threshold.is_none_or(|threshold| elapsed > threshold) {
            log_at_level(
                self.level,
                invocation.method(),
                &format!("took {}", humantime::format_duration(elapsed)),
            );
        }
        result
    }
}
