// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Request spacing for rate-limited endpoints.
//!
//! Public endpoints such as Etherscan's free tier publish a requests-per-second
//! ceiling. [`Throttle`] hands out start slots at least `1 / rate` apart, so a
//! run with several lookups in flight still never exceeds the ceiling.

use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
    time::Duration,
};

use tokio::sync::Mutex;
use tokio::time::Instant;
use tower::Layer;

/// Shared spacing between request starts.
///
/// Clones share state, so one throttle can guard several clients talking to
/// the same endpoint.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use txfilter::transport::Throttle;
///
/// let throttle = Throttle::per_second(Some(5));
/// assert_eq!(throttle.interval(), Some(Duration::from_millis(200)));
/// assert!(Throttle::per_second(None).interval().is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Throttle {
    interval: Option<Duration>,
    next_slot: Arc<Mutex<Option<Instant>>>,
}

impl Throttle {
    /// A throttle that never waits
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Allow at most `requests` request starts per second; `None` or zero is unlimited
    pub fn per_second(requests: Option<u32>) -> Self {
        match requests {
            Some(n) if n > 0 => Self::with_min_delay(Duration::from_secs(1) / n),
            _ => Self::unlimited(),
        }
    }

    /// Keep at least `delay` between consecutive request starts
    pub fn with_min_delay(delay: Duration) -> Self {
        Self {
            interval: (!delay.is_zero()).then_some(delay),
            next_slot: Arc::default(),
        }
    }

    /// The enforced spacing, if any
    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    /// Wait until this caller may start its request
    pub async fn acquire(&self) {
        let Some(interval) = self.interval else {
            return;
        };

        // Reserve the slot under the lock, sleep outside it
        let slot = {
            let mut next_slot = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = next_slot.map_or(now, |next| next.max(now));
            *next_slot = Some(slot + interval);
            slot
        };

        tokio::time::sleep_until(slot).await;
    }
}

/// A Tower layer that delays each request until its [`Throttle`] slot.
#[derive(Clone, Debug, Default)]
pub struct ThrottleLayer {
    throttle: Throttle,
}

impl ThrottleLayer {
    /// Wrap services with the given throttle
    pub fn new(throttle: Throttle) -> Self {
        Self { throttle }
    }
}

impl<S> Layer<S> for ThrottleLayer {
    type Service = ThrottleService<S>;

    fn layer(&self, service: S) -> Self::Service {
        ThrottleService {
            service,
            throttle: self.throttle.clone(),
        }
    }
}

/// A Tower service that waits for a throttle slot before calling the inner service.
#[derive(Clone, Debug)]
pub struct ThrottleService<S> {
    service: S,
    throttle: Throttle,
}

impl<S, Request> tower::Service<Request> for ThrottleService<S>
where
    S: tower::Service<Request> + Clone + Send + 'static,
    S::Future: Send,
    Request: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let throttle = self.throttle.clone();
        let mut service = self.service.clone();

        Box::pin(async move {
            throttle.acquire().await;
            service.call(request).await
        })
    }
}
