//! Geometric height policy.

use rand::prelude::*;
use thiserror::Error;

use crate::height_policy::HeightPolicy;

#[derive(Error, Debug, PartialEq, Eq)]
/// Errors that can occur when creating a [`Geometric`] height policy.
#[expect(
    clippy::module_name_repetitions,
    reason = "Using 'Error' would be too generic and may cause confusion."
)]
#[non_exhaustive]
pub enum GeometricError {
    /// The probability `$\alpha$` must be in the range `$[0, 1)$`.
    #[error("alpha must be in [0, 1).")]
    InvalidProbability,
}

/// A height policy using a geometric distribution.
///
/// Each additional level is granted by an independent trial which succeeds
/// with probability `$\alpha$`; the first failed trial stops the tower. The
/// resulting height `$h$` satisfies `$P(h = n) = \alpha^n (1 - \alpha)$`.
///
/// Unlike a level generator with a fixed number of levels, the distribution
/// is not truncated: the ladder grows to fit whatever height is drawn.
#[derive(Debug)]
pub struct Geometric {
    /// The probability that a tower reaches one level higher.
    alpha: f64,
    /// The random number generator.
    rng: SmallRng,
}

impl Geometric {
    /// Create a new geometric height policy seeded from the thread-local
    /// generator.
    ///
    /// # Errors
    ///
    /// `alpha` must be in `$[0, 1)$`.
    #[inline]
    pub fn new(alpha: f64) -> Result<Self, GeometricError> {
        Self::with_rng(alpha, SmallRng::from_rng(&mut rand::rng()))
    }

    /// Create a new geometric height policy with a fixed seed.
    ///
    /// # Errors
    ///
    /// `alpha` must be in `$[0, 1)$`.
    #[inline]
    pub fn with_seed(alpha: f64, seed: u64) -> Result<Self, GeometricError> {
        Self::with_rng(alpha, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(alpha: f64, rng: SmallRng) -> Result<Self, GeometricError> {
        if !(0.0..1.0).contains(&alpha) {
            return Err(GeometricError::InvalidProbability);
        }
        Ok(Geometric { alpha, rng })
    }

    /// The probability that a tower reaches one level higher.
    #[inline]
    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl HeightPolicy for Geometric {
    /// Count the successful trials before the first failure.
    ///
    /// Each trial draws a uniform variate `$u \in [0, 1)$` and succeeds if
    /// `$u < \alpha$`.
    #[inline]
    fn height(&mut self, _key: i64) -> usize {
        let mut h = 0;
        while self.rng.random::<f64>() < self.alpha {
            h += 1;
        }
        h
    }
}
