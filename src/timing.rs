//! Time source for snapshot throttling.
//!
//! The snapshot coordinator compares float-second timestamps against the
//! auto-capture period. Production uses a monotonic clock; tests drive a
//! manual source to make the capture schedule deterministic.

use std::sync::{Arc, Mutex};
use std::time::Instant;

/// Seconds-since-start time source for the snapshot throttle
#[derive(Debug, Clone)]
pub struct FrameClock {
    source: Source,
}

#[derive(Debug, Clone)]
enum Source {
    Monotonic(Instant),
    Manual(Arc<Mutex<f64>>),
}

impl FrameClock {
    /// Monotonic clock with the current instant as time zero
    pub fn new() -> Self {
        Self {
            source: Source::Monotonic(Instant::now()),
        }
    }

    /// Clock driven explicitly through [`FrameClock::advance_to`].
    ///
    /// Starts at zero; clones share the same time.
    pub fn manual() -> Self {
        Self {
            source: Source::Manual(Arc::new(Mutex::new(0.0))),
        }
    }

    /// Seconds elapsed on the clock
    pub fn pts(&self) -> f64 {
        match &self.source {
            Source::Monotonic(start) => start.elapsed().as_secs_f64(),
            Source::Manual(time) => time.lock().map(|time| *time).unwrap_or(0.0),
        }
    }

    /// Move a manual clock to `pts` seconds; no-op on a monotonic clock
    pub fn advance_to(&self, pts: f64) {
        if let Source::Manual(time) = &self.source {
            if let Ok(mut time) = time.lock() {
                *time = pts;
            }
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotonic_pts() {
        let clock = FrameClock::new();
        let a = clock.pts();
        let b = clock.pts();
        assert!(b >= a);
    }

    #[test]
    fn test_manual_clock_advances() {
        let clock = FrameClock::manual();
        assert_eq!(clock.pts(), 0.0);
        clock.advance_to(2.5);
        assert_eq!(clock.pts(), 2.5);
    }

    #[test]
    fn test_manual_clones_share_time() {
        let clock = FrameClock::manual();
        let other = clock.clone();
        clock.advance_to(7.0);
        assert_eq!(other.pts(), 7.0);
    }

    #[test]
    fn test_advance_is_noop_on_monotonic() {
        let clock = FrameClock::new();
        clock.advance_to(100.0);
        assert!(clock.pts() < 100.0);
    }
}
