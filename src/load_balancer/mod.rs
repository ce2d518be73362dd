//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! Request arrives
//!     → selector.rs (sample k backends, pick fewest in flight)
//!     → registry.rs (acquire guard: in-flight += 1)
//!     → [transport forwards request]
//!     → guard dropped: in-flight -= 1
//! ```
//!
//! # Design Decisions
//! - Backend set is fixed at startup; no runtime add/remove
//! - Each backend owns its counter; no global state
//! - Selection reads counters without locking; the race between read and
//!   increment is accepted
//! - No health-based exclusion: a dead backend fails its requests

pub mod backend;
pub mod error;
pub mod registry;
pub mod selector;

pub use backend::{Backend, BackendGuard};
pub use error::{ConstructionError, SelectionError};
pub use registry::BackendRegistry;
pub use selector::{PowerOfKChoices, SampleWidth};
