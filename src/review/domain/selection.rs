//! Reviewer selection.
//!
//! [`select_initial`] and [`select_replacement`] are pure: they draw from a
//! candidate pool with the supplied random source and perform no I/O.
//! Callers build the pool by removing the author, inactive users, and
//! already-assigned reviewers. [`ReviewerSelector`] owns an entropy-seeded
//! generator shared by the services.

use super::MAX_REVIEWERS;
use crate::directory::domain::UserId;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex, PoisonError};

/// Picks up to `max` distinct reviewers uniformly at random.
///
/// An empty pool yields an empty selection. When the pool holds `max` or
/// fewer candidates all of them are returned in random order.
pub fn select_initial<R>(pool: &[UserId], max: usize, rng: &mut R) -> Vec<UserId>
where
    R: Rng + ?Sized,
{
    pool.choose_multiple(rng, max).cloned().collect()
}

/// Picks one replacement reviewer uniformly at random.
///
/// Returns `None` when the pool is empty.
pub fn select_replacement<R>(pool: &[UserId], rng: &mut R) -> Option<UserId>
where
    R: Rng + ?Sized,
{
    pool.choose(rng).cloned()
}

/// Shared random source for reviewer selection.
///
/// Every selector created with [`ReviewerSelector::new`] is seeded from the
/// operating system, so repeated creation against a stable pool does not
/// keep picking the same reviewers. Clones share one generator.
#[derive(Debug, Clone)]
pub struct ReviewerSelector {
    rng: Arc<Mutex<StdRng>>,
}

impl ReviewerSelector {
    /// Creates a selector seeded from operating system entropy.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Creates a reproducible selector. Intended for tests only.
    #[doc(hidden)]
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    /// Picks up to [`MAX_REVIEWERS`] initial reviewers from `pool`.
    #[must_use]
    pub fn pick_initial(&self, pool: &[UserId]) -> Vec<UserId> {
        self.draw(|rng| select_initial(pool, MAX_REVIEWERS, rng))
    }

    /// Picks one replacement reviewer from `pool`.
    #[must_use]
    pub fn pick_replacement(&self, pool: &[UserId]) -> Option<UserId> {
        self.draw(|rng| select_replacement(pool, rng))
    }

    fn draw<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut rng)
    }
}

impl Default for ReviewerSelector {
    fn default() -> Self {
        Self::new()
    }
}
