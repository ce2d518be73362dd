//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the balancing handler on every path
//! - Wire up middleware (request ID, timeout, tracing)
//! - Hand each request to the routing layer
//! - Serve until the shutdown signal fires

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::BalancerConfig;
use crate::http::client::HyperTransport;
use crate::http::request::{append_forwarded_for, request_id, MakeRequestUuid};
use crate::load_balancer::{BackendRegistry, ConstructionError, PowerOfKChoices, SampleWidth};
use crate::routing::{ForwardError, Router as BalancingRouter};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<BalancingRouter>,
}

/// HTTP front end of the load balancer.
pub struct HttpServer {
    app: Router,
    router: Arc<BalancingRouter>,
}

impl HttpServer {
    /// Build the backend set and HTTP stack from configuration.
    ///
    /// Fails if the backend list or sample width is unusable; the process
    /// should refuse to start in that case.
    pub fn new(config: &BalancerConfig) -> Result<Self, ConstructionError> {
        let registry = BackendRegistry::new(&config.backends)?;
        let width = SampleWidth::new(config.selection.sample_width)?;
        let transport = HyperTransport::new(Duration::from_secs(config.timeouts.connect_secs));
        let router = BalancingRouter::new(registry, PowerOfKChoices::new(width), Arc::new(transport));

        Ok(Self::with_router(
            Arc::new(router),
            Duration::from_secs(config.timeouts.request_secs),
        ))
    }

    /// Serve a pre-built router. Used when the transport is supplied by the caller.
    pub fn with_router(router: Arc<BalancingRouter>, request_timeout: Duration) -> Self {
        let state = AppState {
            router: router.clone(),
        };
        let app = Self::build_router(request_timeout, state);
        Self { app, router }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(request_timeout: Duration, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(balance_handler))
            .route("/", any(balance_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TimeoutLayer::new(request_timeout)),
            )
    }

    pub fn registry(&self) -> &BackendRegistry {
        self.router.registry()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(self, listener: TcpListener, mut shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            backends = self.router.registry().len(),
            k = self.router.selector().width().get(),
            "HTTP server starting"
        );

        let app = self.app.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Balancing handler: pick a backend and forward the request to it.
async fn balance_handler(
    State(state): State<AppState>,
    ConnectInfo(client): ConnectInfo<SocketAddr>,
    mut request: Request<Body>,
) -> Response {
    let request_id = request_id(&request).to_string();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        client = %client,
        "Balancing request"
    );

    append_forwarded_for(request.headers_mut(), client.ip());

    match state.router.handle_request(request).await {
        Ok(response) => response,
        Err(err) => {
            match &err {
                ForwardError::Selection(e) => {
                    tracing::warn!(request_id = %request_id, path = %path, error = %e, "No backend available");
                }
                ForwardError::Transport(e) => {
                    tracing::error!(request_id = %request_id, path = %path, error = %e, "Upstream error");
                }
            }
            err.into_response()
        }
    }
}
