//! Pause policies applied after every request
//!
//! The runner asks a [`DelayPolicy`] how long to wait after each download so
//! the remote servers are not hammered. Production runs use [`RandomDelay`];
//! tests inject [`FixedDelay`] to stay fast and deterministic.

use crate::error::{AppError, Result};
use crate::models::Config;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/// Source of the pause inserted after each request
pub trait DelayPolicy {
    fn next_delay(&mut self) -> Duration;
}

/// Uniformly distributed pause in `[min, max)`
#[derive(Debug, Clone)]
pub struct RandomDelay<R: Rng = StdRng> {
    min_nanos: u64,
    max_nanos: u64,
    rng: R,
}

impl RandomDelay<StdRng> {
    /// Pause policy described by the configuration, seeded if a seed is set
    pub fn from_config(config: &Config) -> Result<Self> {
        let (min, max) = config.delay_bounds();
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(min, max, rng)
    }

    pub fn seeded(min: Duration, max: Duration, seed: u64) -> Result<Self> {
        Self::with_rng(min, max, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomDelay<R> {
    pub fn with_rng(min: Duration, max: Duration, rng: R) -> Result<Self> {
        let min_nanos = to_nanos(min)?;
        let max_nanos = to_nanos(max)?;
        if min_nanos > max_nanos {
            return Err(AppError::validation(format!(
                "Minimum delay {:?} exceeds maximum delay {:?}",
                min, max
            )));
        }

        Ok(Self {
            min_nanos,
            max_nanos,
            rng,
        })
    }
}

impl<R: Rng> DelayPolicy for RandomDelay<R> {
    fn next_delay(&mut self) -> Duration {
        // An empty range degenerates to a fixed pause.
        if self.min_nanos == self.max_nanos {
            return Duration::from_nanos(self.min_nanos);
        }
        Duration::from_nanos(self.rng.random_range(self.min_nanos..self.max_nanos))
    }
}

/// Constant pause
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedDelay(pub Duration);

impl FixedDelay {
    pub fn none() -> Self {
        Self(Duration::ZERO)
    }
}

impl DelayPolicy for FixedDelay {
    fn next_delay(&mut self) -> Duration {
        self.0
    }
}

impl<D: DelayPolicy + ?Sized> DelayPolicy for &mut D {
    fn next_delay(&mut self) -> Duration {
        (**self).next_delay()
    }
}

fn to_nanos(duration: Duration) -> Result<u64> {
    u64::try_from(duration.as_nanos())
        .map_err(|_| AppError::validation(format!("Delay {:?} is too large", duration)))
}
