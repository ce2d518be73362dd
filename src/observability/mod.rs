//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Router / HTTP server produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every request log line
//! - Metric updates are cheap and no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
