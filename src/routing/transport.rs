//! Forwarding transport abstraction.
//!
//! The router decides *which* backend gets a request; a `Transport` moves the
//! bytes. Keeping this behind a trait lets tests stand in a slow or failing
//! transport without opening sockets.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use thiserror::Error;
use url::Url;

/// Failure to forward a request to its chosen backend.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The outbound request could not be built (bad URI rewrite, headers).
    #[error("failed to build upstream request: {0}")]
    Request(String),

    /// Connecting to or talking with the backend failed.
    #[error("upstream request failed: {0}")]
    Upstream(String),
}

/// Sends one request to one destination and returns its response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn forward(&self, destination: &Url, request: Request<Body>) -> Result<Response<Body>, TransportError>;
}
