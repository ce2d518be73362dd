//! Power-of-k-choices selection.
//!
//! Samples `k` distinct backends uniformly at random and picks the one with
//! the fewest in-flight requests. Sampling keeps the decision O(k) and stops
//! concurrent callers from all converging on the same "most idle" backend.

use std::num::NonZeroUsize;
use std::sync::Arc;

use rand::seq::index;
use rand::Rng;

use crate::load_balancer::backend::Backend;
use crate::load_balancer::error::{ConstructionError, SelectionError};
use crate::load_balancer::registry::BackendRegistry;

/// Number of candidates sampled per decision. Always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleWidth(NonZeroUsize);

impl SampleWidth {
    pub fn new(k: i64) -> Result<Self, ConstructionError> {
        usize::try_from(k)
            .ok()
            .and_then(NonZeroUsize::new)
            .map(Self)
            .ok_or(ConstructionError::InvalidSampleWidth(k))
    }

    pub fn get(self) -> usize {
        self.0.get()
    }

    /// Width actually used against a set of `n` backends.
    pub fn effective(self, n: usize) -> usize {
        self.get().min(n)
    }
}

impl Default for SampleWidth {
    fn default() -> Self {
        Self(NonZeroUsize::MIN.saturating_add(1))
    }
}

/// Power-of-k-choices selector.
#[derive(Debug, Clone, Copy, Default)]
pub struct PowerOfKChoices {
    width: SampleWidth,
}

impl PowerOfKChoices {
    pub fn new(width: SampleWidth) -> Self {
        Self { width }
    }

    pub fn width(&self) -> SampleWidth {
        self.width
    }

    /// Choose a backend from the registry using the thread-local RNG.
    pub fn choose(&self, registry: &BackendRegistry) -> Result<Arc<Backend>, SelectionError> {
        self.choose_with(registry.backends(), &mut rand::thread_rng())
    }

    /// Choose a backend from `backends` using the given random source.
    ///
    /// Counters are read once per candidate without any lock; the chosen
    /// backend may have picked up more requests by the time the caller acts.
    pub fn choose_with<R>(&self, backends: &[Arc<Backend>], rng: &mut R) -> Result<Arc<Backend>, SelectionError>
    where
        R: Rng + ?Sized,
    {
        let n = backends.len();
        if n == 0 {
            return Err(SelectionError::NoBackendsAvailable);
        }

        // `index::sample` returns the indices fully shuffled, so sample order
        // is itself random and every subset is equally likely.
        let sample = index::sample(rng, n, self.width.effective(n));

        // min_by_key keeps the first of equal minimums: ties go to the
        // earliest candidate in sample order.
        sample
            .iter()
            .map(|i| &backends[i])
            .min_by_key(|b| b.active())
            .cloned()
            .ok_or(SelectionError::NoBackendsAvailable)
    }
}
