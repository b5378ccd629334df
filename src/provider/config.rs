// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Provider configuration options

use alloy_chains::Chain;
use std::time::Duration;
use url::Url;

use crate::config::constants::{DEFAULT_ETHERSCAN_RATE_LIMIT, DEFAULT_TIMEOUT};
use crate::errors::ProviderError;

/// Connection settings shared by both backends
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use txfilter::provider::ProviderConfig;
///
/// let config = ProviderConfig::new("https://eth.llamarpc.com")
///     .with_rate_limit(10)
///     .with_timeout(Duration::from_secs(5));
/// assert!(config.has_rate_limiting());
/// ```
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Endpoint URL (API base URL for Etherscan, node URL for JSON-RPC)
    pub url: String,
    /// API key, sent as `apikey` by the Etherscan backend
    pub api_key: Option<String>,
    /// Chain to query; Etherscan's multichain API selects it with `chainid`
    pub chain: Chain,
    /// Rate limit in requests per second (None for unlimited)
    pub rate_limit_per_second: Option<u32>,
    /// Request timeout duration
    pub timeout: Option<Duration>,
}

impl ProviderConfig {
    /// Create a new provider configuration for Ethereum mainnet at `url`
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: None,
            chain: Chain::mainnet(),
            rate_limit_per_second: None,
            timeout: None,
        }
    }

    /// Set the API key
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the chain
    #[must_use]
    pub fn with_chain(mut self, chain: Chain) -> Self {
        self.chain = chain;
        self
    }

    /// Set rate limiting (requests per second)
    #[must_use]
    pub fn with_rate_limit(mut self, requests_per_second: u32) -> Self {
        self.rate_limit_per_second = Some(requests_per_second);
        self
    }

    /// Set rate limiting from an optional value
    #[must_use]
    pub fn with_rate_limit_opt(mut self, requests_per_second: Option<u32>) -> Self {
        self.rate_limit_per_second = requests_per_second;
        self
    }

    /// Set request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Check if this configuration includes rate limiting
    #[must_use]
    pub fn has_rate_limiting(&self) -> bool {
        self.rate_limit_per_second.is_some_and(|rps| rps > 0)
    }

    /// Parse `url` as an HTTP(S) endpoint
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidUrl`] if the URL does not parse, its
    /// scheme is not `http` or `https`, or it has no host. A bare
    /// `localhost:8545` parses with scheme `localhost` and is rejected here.
    pub fn endpoint(&self) -> Result<Url, ProviderError> {
        let invalid = |details: String| ProviderError::InvalidUrl {
            url: self.url.clone(),
            details,
        };

        let url = Url::parse(&self.url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!(
                "unsupported scheme '{}', expected http or https",
                url.scheme()
            )));
        }
        if url.host_str().is_none_or(str::is_empty) {
            return Err(invalid("missing host".to_string()));
        }
        Ok(url)
    }
}

/// Preset configurations
impl ProviderConfig {
    /// Etherscan's free tier: API key required, 5 requests per second
    #[must_use]
    pub fn etherscan(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::new(url)
            .with_api_key(api_key)
            .with_rate_limit(DEFAULT_ETHERSCAN_RATE_LIMIT)
            .with_timeout(DEFAULT_TIMEOUT)
    }

    /// A JSON-RPC node; no rate limiting unless configured
    #[must_use]
    pub fn rpc_node(url: impl Into<String>) -> Self {
        Self::new(url).with_timeout(DEFAULT_TIMEOUT)
    }
}
