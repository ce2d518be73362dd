//! Backend abstraction.
//!
//! # Responsibilities
//! - Represent a single upstream server
//! - Own the in-flight request counter used by the selector
//! - Pair every increment with exactly one decrement via a guard

use std::fmt;
use std::ops::Deref;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use url::Url;

use crate::observability::metrics;

/// A single backend server.
#[derive(Debug)]
pub struct Backend {
    /// Destination the transport forwards to.
    url: Url,
    /// Number of requests currently being forwarded to this backend.
    active: AtomicUsize,
}

impl Backend {
    /// Create a new backend with no requests in flight.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            active: AtomicUsize::new(0),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Current number of in-flight requests, as of this read.
    pub fn active(&self) -> usize {
        self.active.load(Ordering::Acquire)
    }

    /// Increment the in-flight count, returning the new value.
    pub fn inc_active(&self) -> usize {
        self.active.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Decrement the in-flight count, returning the new value.
    ///
    /// Saturates at zero: an unpaired decrement is a bug in the caller and
    /// must not wrap the counter around.
    pub fn dec_active(&self) -> usize {
        match self
            .active
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
        {
            Ok(prev) => prev - 1,
            Err(_) => {
                tracing::error!(backend = %self.url, "Unpaired in-flight decrement ignored");
                0
            }
        }
    }

    /// Increment the in-flight count and return a guard that undoes it on drop.
    pub fn acquire(self: &Arc<Self>) -> BackendGuard {
        let active = self.inc_active();
        metrics::record_active(self.url.as_str(), active);
        BackendGuard {
            backend: self.clone(),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

/// RAII guard for one in-flight request.
///
/// The decrement runs exactly once, on whichever path the guard leaves scope:
/// normal return, error, panic unwind or a dropped (cancelled) future.
#[derive(Debug)]
pub struct BackendGuard {
    backend: Arc<Backend>,
}

impl BackendGuard {
    pub fn backend(&self) -> &Arc<Backend> {
        &self.backend
    }
}

impl Deref for BackendGuard {
    type Target = Backend;
    fn deref(&self) -> &Self::Target {
        &self.backend
    }
}

impl Drop for BackendGuard {
    fn drop(&mut self) {
        let active = self.backend.dec_active();
        metrics::record_active(self.backend.url.as_str(), active);
    }
}
