//! kplus-balancer: an HTTP load balancer using power-of-k-choices selection.
//!
//! Each request samples `k` backends at random and goes to the one with the
//! fewest requests currently in flight.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod load_balancer;
pub mod observability;
pub mod routing;

pub use config::schema::BalancerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use load_balancer::{BackendRegistry, PowerOfKChoices, SampleWidth};
pub use routing::Router;
