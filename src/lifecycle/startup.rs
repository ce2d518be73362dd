//! Startup orchestration.
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Validate the whole config before touching the network
//! - Listener binds last (traffic only when ready)

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::validation::validate_config;
use crate::config::{BalancerConfig, ConfigError};
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::load_balancer::ConstructionError;
use crate::observability::metrics;

/// Reasons the balancer refuses to start.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("cannot build backend set: {0}")]
    Construction(#[from] ConstructionError),

    #[error("failed to install metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Validate `config`, bind the listener and serve until SIGINT/SIGTERM.
pub async fn start(config: BalancerConfig) -> Result<(), StartupError> {
    validate_config(&config).map_err(ConfigError::Validation)?;

    let server = HttpServer::new(&config)?;

    if config.observability.metrics_enabled {
        let addr = config
            .observability
            .metrics_address
            .parse::<std::net::SocketAddr>()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
        metrics::init_metrics(addr)?;
    }

    let bind_addr = config
        .listener
        .socket_addr()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    let listener = TcpListener::bind(bind_addr).await?;

    for backend in server.registry().backends() {
        tracing::debug!(backend = %backend, "Backend registered");
    }

    let shutdown = Shutdown::new();
    let signals = shutdown.trigger_on_signal();

    server.run(listener, shutdown.subscribe()).await?;
    signals.abort();

    Ok(())
}
