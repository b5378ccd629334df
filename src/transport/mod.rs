// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Transport layer utilities shared by the provider backends.
//!
//! Both backends send every remote call through the same two concerns:
//!
//! - [`Throttle`] spaces requests so an endpoint's published rate limit is
//!   respected. [`ThrottleLayer`] applies it to an Alloy RPC client; the
//!   Etherscan client awaits it directly before each HTTP call.
//! - [`RequestStats`] counts requests and failures. [`LoggingLayer`] records
//!   them for the JSON-RPC backend and wraps each call in a tracing span.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use txfilter::transport::{LoggingLayer, RequestStats, ThrottleLayer, Throttle};
//! use alloy_rpc_client::ClientBuilder;
//!
//! let stats = RequestStats::default();
//! let client = ClientBuilder::default()
//!     .layer(ThrottleLayer::new(Throttle::per_second(Some(10))))
//!     .layer(LoggingLayer::new(stats.clone()))
//!     .http(rpc_url);
//! ```

mod logging;
mod throttle;

pub use logging::{LoggingLayer, LoggingService, RequestStats};
pub use throttle::{Throttle, ThrottleLayer, ThrottleService};
