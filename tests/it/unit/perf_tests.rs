//! Unit tests for perf module.

use castboard::perf::{ScopedTimer, is_profiling_enabled, set_profiling_enabled};

#[test]
fn test_scoped_timer_creation() {
    // High threshold: dropping must not warn.
    let timer = ScopedTimer::new("test_op", 1000.0);
    assert!(timer.elapsed_ms() >= 0.0);
    assert!(!timer.is_over_threshold());
}

#[test]
fn test_zero_threshold_is_exceeded() {
    let timer = ScopedTimer::new("busy_op", 0.0);
    std::thread::sleep(std::time::Duration::from_millis(2));
    assert!(timer.is_over_threshold());
}

#[test]
fn test_profiling_toggle() {
    let initial = is_profiling_enabled();
    set_profiling_enabled(!initial);
    assert_eq!(is_profiling_enabled(), !initial);
    set_profiling_enabled(initial);
}

#[test]
fn test_profile_scope_macro() {
    fn timed() -> u32 {
        castboard::profile_scope!("timed", 1000.0);
        42
    }
    assert_eq!(timed(), 42);
}
