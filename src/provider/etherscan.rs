// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Etherscan HTTP API backend
//!
//! Chain data comes from the `proxy` module, which forwards JSON-RPC calls and
//! wraps their results; the exchange rate comes from `stats/ethprice`. Every
//! request carries `chainid`, `module`, `action` and `apikey` query parameters.
//!
//! Etherscan reports failures in the body, not the HTTP status:
//!
//! - `{"status":"0","message":"NOTOK","result":"Invalid API Key"}` for API errors
//! - `{"jsonrpc":"2.0","id":1,"error":{"code":-32602,"message":"..."}}` for
//!   errors from the proxied node
//!
//! [`decode_envelope`] maps both onto [`ProviderError`].

use alloy_primitives::BlockNumber;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn, Instrument};
use url::Url;

use crate::convert::hex_to_u64;
use crate::errors::ProviderError;
use crate::transport::{RequestStats, Throttle};
use crate::types::rate::ExchangeRate;
use crate::types::transaction::{RawBlock, RawReceipt};

use super::config::ProviderConfig;
use super::{ChainDataProvider, ExchangeRateSource};

/// Body shape shared by every Etherscan response
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    result: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

/// The `result` object of `stats/ethprice`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EthPrice {
    /// USD per ETH, as a decimal string
    pub ethusd: String,
}

/// Decode an Etherscan response body into its `result`
///
/// Returns `Ok(None)` when `result` is absent or `null`, which is how the
/// proxy reports an unknown block or transaction.
///
/// # Errors
///
/// - [`ProviderError::Rpc`] if the body carries a JSON-RPC `error` object
/// - [`ProviderError::Api`] if `status` is `"0"`
/// - [`ProviderError::Decode`] if the body or `result` has the wrong shape
///
/// # Example
///
/// ```rust
/// use txfilter::provider::decode_envelope;
///
/// let height: Option<String> =
///     decode_envelope("eth_blockNumber", r#"{"jsonrpc":"2.0","id":83,"result":"0x64"}"#).unwrap();
/// assert_eq!(height.as_deref(), Some("0x64"));
/// ```
pub fn decode_envelope<T: DeserializeOwned>(
    operation: &str,
    body: &str,
) -> Result<Option<T>, ProviderError> {
    let envelope: Envelope = serde_json::from_str(body)
        .map_err(|e| ProviderError::decode(operation, format!("invalid JSON body: {e}")))?;

    if let Some(error) = envelope.error {
        return Err(ProviderError::Rpc {
            operation: operation.to_string(),
            code: error.code,
            message: error.message,
        });
    }

    if envelope.status.as_deref() == Some("0") {
        // The explanation is usually in `result`; `message` is just "NOTOK"
        let message = match &envelope.result {
            Some(serde_json::Value::String(s)) => s.clone(),
            _ => envelope.message.unwrap_or_else(|| "unknown error".to_string()),
        };
        return Err(ProviderError::Api {
            operation: operation.to_string(),
            message,
        });
    }

    match envelope.result {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|e| ProviderError::decode(operation, e.to_string())),
    }
}

/// Client for Etherscan's multichain API
///
/// Implements both [`ChainDataProvider`] and [`ExchangeRateSource`]; share one
/// instance behind an `Arc` when it serves both so they share a throttle.
#[derive(Debug, Clone)]
pub struct EtherscanClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
    chain_id: u64,
    throttle: Throttle,
    stats: RequestStats,
}

impl EtherscanClient {
    /// Create a client from a provider configuration
    ///
    /// # Errors
    ///
    /// Fails if the API key is missing or empty, the URL is malformed, or the
    /// HTTP client cannot be built.
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ProviderError::MissingApiKey {
                backend: "etherscan",
            })?;

        let base_url = config.endpoint()?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ProviderError::http("client setup", e))?;

        Ok(Self {
            http,
            base_url,
            api_key,
            chain_id: config.chain.id(),
            throttle: Throttle::per_second(config.rate_limit_per_second),
            stats: RequestStats::default(),
        })
    }

    /// Record requests into `stats` instead of a private counter
    #[must_use]
    pub fn with_stats(mut self, stats: RequestStats) -> Self {
        self.stats = stats;
        self
    }

    /// Requests made through this client
    pub fn stats(&self) -> &RequestStats {
        &self.stats
    }

    /// Query parameters for one call, in the order they are sent
    fn query_params(
        &self,
        module: &str,
        action: &str,
        extra: &[(&'static str, String)],
    ) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("chainid", self.chain_id.to_string()),
            ("module", module.to_string()),
            ("action", action.to_string()),
        ];
        params.extend(extra.iter().cloned());
        params.push(("apikey", self.api_key.clone()));
        params
    }

    async fn call<T: DeserializeOwned>(
        &self,
        module: &str,
        action: &str,
        extra: &[(&'static str, String)],
    ) -> Result<Option<T>, ProviderError> {
        let params = self.query_params(module, action, extra);
        let span = tracing::debug_span!("etherscan_call", module, action);

        async {
            self.throttle.acquire().await;
            self.stats.record_request();

            let result = self.send(action, &params).await;
            match &result {
                Ok(_) => debug!("Etherscan response"),
                Err(e) => {
                    self.stats.record_failure();
                    warn!(error = %e, "Etherscan error");
                }
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        action: &str,
        params: &[(&'static str, String)],
    ) -> Result<Option<T>, ProviderError> {
        let response = self
            .http
            .get(self.base_url.clone())
            .query(params)
            .send()
            .await
            .map_err(|e| ProviderError::http(action, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::HttpStatus {
                operation: action.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::http(action, e))?;
        decode_envelope(action, &body)
    }
}

#[async_trait]
impl ChainDataProvider for EtherscanClient {
    async fn current_height(&self) -> Result<BlockNumber, ProviderError> {
        const OP: &str = "eth_blockNumber";
        let hex: String = self
            .call("proxy", OP, &[])
            .await?
            .ok_or_else(|| ProviderError::decode(OP, "empty result"))?;
        hex_to_u64(&hex).map_err(|e| ProviderError::malformed_field(OP, e))
    }

    async fn block(&self, height: BlockNumber) -> Result<RawBlock, ProviderError> {
        let extra = [("tag", format!("{height:#x}")), ("boolean", "true".to_string())];
        self.call("proxy", "eth_getBlockByNumber", &extra)
            .await?
            .ok_or(ProviderError::BlockNotFound {
                block_number: height,
            })
    }

    async fn receipt(&self, tx_hash: &str) -> Result<RawReceipt, ProviderError> {
        let extra = [("txhash", tx_hash.to_string())];
        self.call("proxy", "eth_getTransactionReceipt", &extra)
            .await?
            .ok_or_else(|| ProviderError::ReceiptNotFound {
                tx_hash: tx_hash.to_string(),
            })
    }
}

#[async_trait]
impl ExchangeRateSource for EtherscanClient {
    async fn exchange_rate(&self) -> Result<ExchangeRate, ProviderError> {
        let price: EthPrice =
            self.call("stats", "ethprice", &[])
                .await?
                .ok_or_else(|| ProviderError::InvalidRate {
                    value: "null".to_string(),
                })?;
        ExchangeRate::parse(&price.ethusd)
    }
}
