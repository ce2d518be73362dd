//! Response bodies that keep their backend counted as in flight.
//!
//! A forwarded response is not finished when its headers arrive. The
//! backend's guard travels inside the body stream and is released once the
//! body has been read to the end, or when the body is dropped because the
//! client went away.

use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::{Body, BodyDataStream, Bytes};
use axum::http::Response;
use futures_util::Stream;

use crate::load_balancer::BackendGuard;

struct GuardedStream {
    inner: BodyDataStream,
    guard: Option<BackendGuard>,
}

impl Stream for GuardedStream {
    type Item = Result<Bytes, axum::Error>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let next = Pin::new(&mut self.inner).poll_next(cx);
        if let Poll::Ready(None) = next {
            // End of body: release now rather than when the server gets
            // around to dropping the stream.
            self.guard.take();
        }
        next
    }
}

/// Move `guard` into the body of `response`.
pub fn hold_until_complete(response: Response<Body>, guard: BackendGuard) -> Response<Body> {
    let (parts, body) = response.into_parts();
    let stream = GuardedStream {
        inner: body.into_data_stream(),
        guard: Some(guard),
    };
    Response::from_parts(parts, Body::from_stream(stream))
}
