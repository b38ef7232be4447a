//! Monotonic clock reporting fractional seconds

use std::time::Instant;

/// Monotonic seconds since the clock was created.
///
/// Values are only meaningful relative to each other, the same way a
/// performance counter is: the origin is arbitrary but fixed for the run.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Seconds elapsed since the origin
    pub fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_clock_never_goes_backwards() {
        let clock = MonotonicClock::new();
        let mut previous = clock.now();
        for _ in 0..1000 {
            let current = clock.now();
            assert!(current >= previous);
            previous = current;
        }
    }

    #[test]
    fn test_clock_advances() {
        let clock = MonotonicClock::new();
        let start = clock.now();
        std::thread::sleep(Duration::from_millis(5));
        assert!(clock.now() - start >= 0.004);
    }
}
