//! Timing instrumentation.
//!
//! [`ScopedTimer`] measures a block RAII-style and logs when it runs past its
//! threshold. Fetches and projections are wrapped with it so slow requests show
//! up in the log without a profiler attached.
//!
//! Enable the `profiling` feature to log every timed scope, not just the slow
//! ones:
//! ```toml
//! [dependencies]
//! castboard = { features = ["profiling"] }
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{debug, warn};

/// Global flag to enable/disable verbose timing at runtime
static PROFILING_ENABLED: AtomicBool = AtomicBool::new(cfg!(feature = "profiling"));

/// Check if verbose timing is enabled
pub fn is_profiling_enabled() -> bool {
    PROFILING_ENABLED.load(Ordering::Relaxed)
}

/// Enable or disable verbose timing at runtime
pub fn set_profiling_enabled(enabled: bool) {
    PROFILING_ENABLED.store(enabled, Ordering::Relaxed);
}

/// Time a scope with the given name and warning threshold in milliseconds.
///
/// # Example
/// ```ignore
/// fn project(records: &[CharacterRecord]) -> Projection {
///     profile_scope!("project", 16.67);
///     // ...
/// }
/// ```
#[macro_export]
macro_rules! profile_scope {
    ($name:expr, $threshold_ms:expr) => {
        let _timer = $crate::perf::ScopedTimer::new($name, $threshold_ms);
    };
}

/// RAII timer that logs on drop
pub struct ScopedTimer {
    name: &'static str,
    start: Instant,
    threshold_ms: f64,
}

impl ScopedTimer {
    /// Create a new scoped timer with a warning threshold.
    pub fn new(name: &'static str, threshold_ms: f64) -> Self {
        Self {
            name,
            start: Instant::now(),
            threshold_ms,
        }
    }

    /// Get elapsed time without stopping the timer.
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    /// Whether the scope has already run past its threshold.
    pub fn is_over_threshold(&self) -> bool {
        self.elapsed_ms() > self.threshold_ms
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        let elapsed_ms = self.elapsed_ms();
        if elapsed_ms > self.threshold_ms {
            warn!(
                "Slow operation: {} took {:.2}ms (threshold: {:.2}ms)",
                self.name, elapsed_ms, self.threshold_ms
            );
        } else if is_profiling_enabled() {
            debug!("[PERF] {}: {:.2}ms", self.name, elapsed_ms);
        }
    }
}
