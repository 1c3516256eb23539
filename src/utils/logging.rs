use log::{error, log_enabled, warn, Level};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::DEFAULT_MAX_WARNING_REPEATS;

/// Simple scoped timer for profiling critical sections.
pub struct ScopedTimer<'a> {
    label: &'a str,
    start: Instant,
}

impl<'a> ScopedTimer<'a> {
    pub fn new(label: &'a str) -> Self {
        if log_enabled!(Level::Trace) {
            log::trace!("⏱️ start {label}");
        }
        Self {
            label,
            start: Instant::now(),
        }
    }
}

impl<'a> Drop for ScopedTimer<'a> {
    fn drop(&mut self) {
        if log_enabled!(Level::Trace) {
            let elapsed = self.start.elapsed();
            log::trace!("⏱️ end {} ({} µs)", self.label, elapsed.as_micros());
        }
    }
}

/// Registers a warning when frame budget is exceeded.
pub fn warn_if_frame_budget_exceeded(duration: Duration, budget_ms: f32) {
    if duration.as_secs_f32() * 1000.0 > budget_ms {
        warn!(
            "Frame exceeded budget: {:.2} ms > {:.2} ms",
            duration.as_secs_f32() * 1000.0,
            budget_ms
        );
    }
}

/// Rate-limited warning and error reporting for one simulation session.
///
/// Each message id is logged at most `max_repeats` times; later occurrences
/// are only counted until [`Diagnostics::reset`] is called.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    counts: HashMap<String, u32>,
    max_repeats: u32,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_WARNING_REPEATS)
    }
}

impl Diagnostics {
    pub fn new(max_repeats: u32) -> Self {
        Self {
            counts: HashMap::new(),
            max_repeats,
        }
    }

    /// Wraps a fresh instance for sharing between the simulation and its host.
    pub fn shared() -> DiagnosticsHandle {
        Arc::new(Mutex::new(Self::default()))
    }

    /// Logs a warning unless `id` was already reported `max_repeats` times.
    ///
    /// Returns whether the warning was emitted.
    pub fn warn(&mut self, id: &str, detail: &str) -> bool {
        let count = self.bump(id);
        if count > self.max_repeats {
            return false;
        }
        if count == self.max_repeats {
            warn!("[{id}] {detail} (repeated {count} times, further occurrences suppressed)");
        } else {
            warn!("[{id}] {detail}");
        }
        true
    }

    /// Logs an error; errors are counted but never suppressed.
    pub fn error(&mut self, id: &str, detail: &str) {
        self.bump(id);
        error!("[{id}] {detail}");
    }

    pub fn count(&self, id: &str) -> u32 {
        self.counts.get(id).copied().unwrap_or(0)
    }

    pub fn max_repeats(&self) -> u32 {
        self.max_repeats
    }

    pub fn reset(&mut self) {
        self.counts.clear();
    }

    fn bump(&mut self, id: &str) -> u32 {
        let count = self.counts.entry(id.to_owned()).or_insert(0);
        *count += 1;
        *count
    }
}

/// Diagnostics shared between the simulation and the application hosting it.
pub type DiagnosticsHandle = Arc<Mutex<Diagnostics>>;
