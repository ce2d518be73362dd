//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, timeout, tracing)
//!     → request.rs (request ID, X-Forwarded-For)
//!     → [router picks backend, holds in-flight guard]
//!     → client.rs (rewrite URI, forward with hyper client)
//!     → response.rs (map failures to 502/503)
//!     → Send to client
//! ```

pub mod client;
pub mod request;
pub mod response;
pub mod server;

pub use client::HyperTransport;
pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use server::HttpServer;
