//! Middleware layer.
//!
//! Cross-cutting concerns applied around every dispatched request. For now
//! that is tracing: one span per request carrying method and path, closed
//! with the status and latency.

use std::future::Future;
use std::time::Instant;

use tracing::{Instrument, info, info_span};

use crate::response::Response;

/// Runs `dispatch` inside a `request` span and logs its outcome.
pub(crate) async fn trace<F>(method: &http::Method, path: &str, dispatch: F) -> Response
where
    F: Future<Output = Response>,
{
    let span = info_span!("request", method = %method, path = %path);
    let start = Instant::now();
    let res = dispatch.instrument(span.clone()).await;
    span.in_scope(|| {
        info!(
            status = res.status_code().as_u16(),
            latency_us = start.elapsed().as_micros() as u64,
            "request completed"
        );
    });
    res
}
