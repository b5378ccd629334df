// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Tower-based logging layer for the JSON-RPC backend.
//!
//! Each call gets a `rpc_call` span with its method and duration, and is
//! counted in a shared [`RequestStats`] so a run can report how many remote
//! calls it made.

use std::{
    future::Future,
    pin::Pin,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    task::{Context, Poll},
    time::Instant,
};

use alloy_json_rpc::{RequestPacket, ResponsePacket};
use alloy_transport::TransportError;
use tower::Layer;
use tracing::{debug, warn, Instrument};

/// Counters for remote calls made during a run.
///
/// Clones share the same counters.
#[derive(Clone, Debug, Default)]
pub struct RequestStats {
    inner: Arc<Counters>,
}

#[derive(Debug, Default)]
struct Counters {
    requests: AtomicU64,
    failures: AtomicU64,
}

impl RequestStats {
    /// Record that a request was sent
    pub fn record_request(&self) {
        self.inner.requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Record that a request failed
    pub fn record_failure(&self) {
        self.inner.failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Requests sent so far
    pub fn requests(&self) -> u64 {
        self.inner.requests.load(Ordering::Relaxed)
    }

    /// Requests that failed so far
    pub fn failures(&self) -> u64 {
        self.inner.failures.load(Ordering::Relaxed)
    }
}

/// A Tower layer that logs and counts RPC requests.
///
/// # Example
///
/// ```rust,ignore
/// use txfilter::transport::{LoggingLayer, RequestStats};
/// use alloy_rpc_client::ClientBuilder;
///
/// let stats = RequestStats::default();
/// let client = ClientBuilder::default()
///     .layer(LoggingLayer::new(stats.clone()))
///     .http(rpc_url);
/// ```
#[derive(Clone, Debug, Default)]
pub struct LoggingLayer {
    stats: RequestStats,
}

impl LoggingLayer {
    /// Creates a logging layer that records into `stats`.
    pub fn new(stats: RequestStats) -> Self {
        Self { stats }
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = LoggingService<S>;

    fn layer(&self, service: S) -> Self::Service {
        LoggingService {
            service,
            stats: self.stats.clone(),
        }
    }
}

/// A Tower service that logs and counts RPC requests.
#[derive(Clone, Debug)]
pub struct LoggingService<S> {
    service: S,
    stats: RequestStats,
}

impl<S> tower::Service<RequestPacket> for LoggingService<S>
where
    S: tower::Service<RequestPacket, Response = ResponsePacket, Error = TransportError>
        + Clone
        + Send
        + 'static,
    S::Future: Send,
{
    type Response = ResponsePacket;
    type Error = TransportError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&mut self, request: RequestPacket) -> Self::Future {
        let stats = self.stats.clone();
        let mut service = self.service.clone();
        let method = extract_method(&request);
        let span = tracing::debug_span!("rpc_call", method = %method);

        Box::pin(
            async move {
                let start = Instant::now();
                stats.record_request();

                let result = service.call(request).await;
                let duration_ms = start.elapsed().as_millis() as u64;

                match &result {
                    Ok(_) => debug!(duration_ms, "RPC response"),
                    Err(e) => {
                        stats.record_failure();
                        warn!(error = %e, duration_ms, "RPC error");
                    }
                }

                result
            }
            .instrument(span),
        )
    }
}

/// Extract the RPC method name from a request packet.
fn extract_method(request: &RequestPacket) -> String {
    match request {
        RequestPacket::Single(req) => req.method().to_string(),
        RequestPacket::Batch(reqs) => match reqs.as_slice() {
            [] => "batch(empty)".to_string(),
            [only] => only.method().to_string(),
            many => format!("batch({} calls)", many.len()),
        },
    }
}
