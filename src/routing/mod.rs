//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request
//!     → router.rs (select backend, hold in-flight guard)
//!     → transport.rs (forward to the chosen destination)
//!     → body.rs (guard rides in the response body until it is read)
//!     → Return: backend response or ForwardError
//! ```
//!
//! # Design Decisions
//! - Single backend set; every request is eligible for every backend
//! - Transport is a trait so the router can be driven without sockets
//! - A failed forward is reported, never retried

pub mod body;
pub mod router;
pub mod transport;

pub use router::{ForwardError, Router};
pub use transport::{Transport, TransportError};
