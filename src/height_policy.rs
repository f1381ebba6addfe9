//! Each insertion into the skip list builds a tower above its base node. The
//! number of extra levels is chosen by a [`HeightPolicy`], independently of
//! the current contents of the list.
//!
//! Two policies are provided:
//!
//! - [`Geometric`]: the height is the number of consecutive successes of
//!   independent Bernoulli($\alpha$) trials before the first failure, giving
//!   a geometric distribution over $\{0, 1, 2, \dots\}$ with mean
//!   $\alpha / (1 - \alpha)$.
//! - [`Valuation`]: the height is the 2-adic valuation of the key, which makes
//!   the structure of the list a pure function of its contents.
//!
//! [`Policy`] selects between the two from a single parameter $\alpha$: any
//! value in $[0, 1)$ is a probability, anything else (`NaN` included) selects
//! the deterministic policy.

mod geometric;
mod valuation;

pub use geometric::{Geometric, GeometricError};
pub use valuation::Valuation;

// ////////////////////////////////////////////////////////////////////////////
// Height Policy
// ////////////////////////////////////////////////////////////////////////////

/// Decides how many levels above the base a new tower spans.
pub trait HeightPolicy {
    /// Height for the tower of a new entry with the given key.
    ///
    /// A height of `0` means the entry only occupies the base level.
    #[must_use]
    fn height(&mut self, key: i64) -> usize;
}

impl<P: HeightPolicy + ?Sized> HeightPolicy for &mut P {
    #[inline]
    fn height(&mut self, key: i64) -> usize {
        (**self).height(key)
    }
}

impl<P: HeightPolicy + ?Sized> HeightPolicy for Box<P> {
    #[inline]
    fn height(&mut self, key: i64) -> usize {
        (**self).height(key)
    }
}

// ////////////////////////////////////////////////////////////////////////////
// Policy
// ////////////////////////////////////////////////////////////////////////////

/// Height policy selected from a single parameter $\alpha$.
#[derive(Debug)]
#[non_exhaustive]
pub enum Policy {
    /// Randomized heights, for $0 \le \alpha < 1$.
    Geometric(Geometric),
    /// Key-derived heights, for every other $\alpha$.
    Valuation(Valuation),
}

impl Policy {
    /// Select the policy for `alpha`, seeding the randomized policy from the
    /// thread-local generator.
    #[inline]
    #[must_use]
    pub fn from_alpha(alpha: f64) -> Self {
        Geometric::new(alpha).map_or(Policy::Valuation(Valuation), Policy::Geometric)
    }

    /// Select the policy for `alpha`, seeding the randomized policy with
    /// `seed` so that runs are reproducible.
    #[inline]
    #[must_use]
    pub fn from_alpha_seeded(alpha: f64, seed: u64) -> Self {
        Geometric::with_seed(alpha, seed)
            .map_or(Policy::Valuation(Valuation), Policy::Geometric)
    }

    /// Returns `true` if heights depend on the key only.
    #[inline]
    #[must_use]
    pub fn is_deterministic(&self) -> bool {
        matches!(self, Policy::Valuation(_))
    }
}

impl HeightPolicy for Policy {
    #[inline]
    fn height(&mut self, key: i64) -> usize {
        match self {
            Policy::Geometric(g) => g.height(key),
            Policy::Valuation(v) => v.height(key),
        }
    }
}
