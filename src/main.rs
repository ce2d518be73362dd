//! kplus-balancer
//!
//! HTTP load balancer that forwards each request to the least-loaded of `k`
//! randomly sampled backends.
//!
//! ```text
//!     Client ──▶ axum server ──▶ Router ──▶ PowerOfKChoices ──▶ BackendRegistry
//!                                  │              (sample k, pick min in-flight)
//!                                  ▼
//!                           HyperTransport ──▶ Backend
//! ```
//!
//! Configuration comes from defaults, an optional TOML file (`--config`) and
//! command-line flags, in increasing order of precedence.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use kplus_balancer::config::loader::read_config;
use kplus_balancer::config::BalancerConfig;
use kplus_balancer::lifecycle;
use kplus_balancer::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "kplus-balancer")]
#[command(version)]
#[command(about = "HTTP load balancer with power-of-k-choices backend selection")]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Comma separated backend URLs
    #[arg(long, value_delimiter = ',')]
    backends: Option<Vec<String>>,

    /// Address to listen on (e.g. ":8080" or "127.0.0.1:8080")
    #[arg(long)]
    addr: Option<String>,

    /// Number of backends to sample per request
    #[arg(short, allow_negative_numbers = true)]
    k: Option<i64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn into_config(self) -> Result<BalancerConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => BalancerConfig::default(),
        };

        if let Some(backends) = self.backends {
            config.backends = backends;
        }
        if let Some(addr) = self.addr {
            config.listener.bind_address = addr;
        }
        if let Some(k) = self.k {
            config.selection.sample_width = k;
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Cli::parse().into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("kplus-balancer: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config.observability.log_level);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "kplus-balancer starting");

    match lifecycle::start(config).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Balancer exited with error");
            ExitCode::FAILURE
        }
    }
}
