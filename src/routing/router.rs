//! Per-request dispatch.
//!
//! # Responsibilities
//! - Ask the selector for a backend
//! - Hold the backend's in-flight guard until the response body is done
//! - Report no-backend and transport failures to the caller
//!
//! # Design Decisions
//! - No retry against another backend on failure
//! - No lock is held while forwarding; only the backend's own counter moves

use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, Response};
use thiserror::Error;

use crate::load_balancer::{BackendRegistry, PowerOfKChoices, SelectionError};
use crate::observability::metrics;
use crate::routing::body::hold_until_complete;
use crate::routing::transport::{Transport, TransportError};

/// Why a request could not be forwarded.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Glues selection, load accounting and transport together.
#[derive(Clone)]
pub struct Router {
    registry: BackendRegistry,
    selector: PowerOfKChoices,
    transport: Arc<dyn Transport>,
}

impl Router {
    pub fn new(registry: BackendRegistry, selector: PowerOfKChoices, transport: Arc<dyn Transport>) -> Self {
        Self {
            registry,
            selector,
            transport,
        }
    }

    pub fn registry(&self) -> &BackendRegistry {
        &self.registry
    }

    pub fn selector(&self) -> &PowerOfKChoices {
        &self.selector
    }

    /// Forward one request to a backend chosen by power-of-k-choices.
    pub async fn handle_request(&self, request: Request<Body>) -> Result<Response<Body>, ForwardError> {
        let start = Instant::now();
        let method = request.method().clone();

        let backend = match self.selector.choose(&self.registry) {
            Ok(backend) => backend,
            Err(e) => {
                metrics::record_request(method.as_str(), 503, "none", start);
                return Err(e.into());
            }
        };

        // Dropped on every exit path, including cancellation of this future.
        // On success it moves into the response body instead.
        let guard = self.registry.acquire(&backend);
        metrics::record_selection(backend.url().as_str());

        tracing::debug!(
            backend = %backend,
            active = guard.active(),
            method = %method,
            path = %request.uri().path(),
            "Forwarding request"
        );

        match self.transport.forward(backend.url(), request).await {
            Ok(response) => {
                metrics::record_request(method.as_str(), response.status().as_u16(), backend.url().as_str(), start);
                Ok(hold_until_complete(response, guard))
            }
            Err(e) => {
                drop(guard);
                metrics::record_request(method.as_str(), 502, backend.url().as_str(), start);
                Err(ForwardError::Transport(e))
            }
        }
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("registry", &self.registry)
            .field("selector", &self.selector)
            .finish_non_exhaustive()
    }
}
