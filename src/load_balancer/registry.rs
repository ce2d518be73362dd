//! Backend registry.
//!
//! # Responsibilities
//! - Build the fixed backend set from configured addresses
//! - Hand out snapshots of the set to concurrent readers
//! - Expose atomic increment/decrement of a backend's in-flight count
//!
//! # Design Decisions
//! - The set is published once behind an `Arc<[_]>` and never mutated
//!   structurally, so readers need no lock
//! - Each backend owns its counter; two registries never share state

use std::sync::Arc;

use url::Url;

use crate::load_balancer::backend::{Backend, BackendGuard};
use crate::load_balancer::error::ConstructionError;

/// The fixed, ordered, non-empty set of backends for a running instance.
#[derive(Debug, Clone)]
pub struct BackendRegistry {
    backends: Arc<[Arc<Backend>]>,
}

impl BackendRegistry {
    /// Build a registry with one backend per address, in input order.
    pub fn new<I, S>(addresses: I) -> Result<Self, ConstructionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let backends = addresses
            .into_iter()
            .map(|address| parse_backend_url(address.as_ref()).map(|url| Arc::new(Backend::new(url))))
            .collect::<Result<Vec<_>, _>>()?;

        if backends.is_empty() {
            return Err(ConstructionError::EmptyBackendSet);
        }

        Ok(Self {
            backends: backends.into(),
        })
    }

    /// Return an independently iterable copy of the backend list.
    ///
    /// Counters are live: values read through the handles reflect whatever
    /// other requests have done since.
    pub fn snapshot(&self) -> Vec<Arc<Backend>> {
        self.backends.to_vec()
    }

    /// Borrow the backend list without copying it.
    pub fn backends(&self) -> &[Arc<Backend>] {
        &self.backends
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    pub fn increment(&self, backend: &Backend) -> usize {
        backend.inc_active()
    }

    pub fn decrement(&self, backend: &Backend) -> usize {
        backend.dec_active()
    }

    /// Increment the backend's count for the lifetime of the returned guard.
    pub fn acquire(&self, backend: &Arc<Backend>) -> BackendGuard {
        backend.acquire()
    }
}

/// Parse a backend address, requiring an absolute URI with scheme and host.
pub fn parse_backend_url(address: &str) -> Result<Url, ConstructionError> {
    let invalid = |reason: String| ConstructionError::InvalidAddress {
        address: address.to_string(),
        reason,
    };

    let url = Url::parse(address).map_err(|e| invalid(e.to_string()))?;
    if url.cannot_be_a_base() || url.host_str().map_or(true, str::is_empty) {
        return Err(invalid("missing host".to_string()));
    }
    Ok(url)
}
