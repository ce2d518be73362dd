//! Mapping forwarding failures to client responses.
//!
//! - No backend could be chosen → 503 Service Unavailable
//! - Backend unreachable or failed mid-request → 502 Bad Gateway

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::routing::ForwardError;

impl ForwardError {
    pub fn status(&self) -> StatusCode {
        match self {
            ForwardError::Selection(_) => StatusCode::SERVICE_UNAVAILABLE,
            ForwardError::Transport(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ForwardError {
    fn into_response(self) -> Response {
        let body = match &self {
            ForwardError::Selection(e) => e.to_string(),
            ForwardError::Transport(_) => "upstream request failed".to_string(),
        };
        (self.status(), body).into_response()
    }
}
