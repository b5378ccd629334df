// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! JSON-RPC node backend

use alloy_json_rpc::RpcError;
use alloy_primitives::BlockNumber;
use alloy_rpc_client::{ClientBuilder, RpcClient};
use alloy_transport::TransportError;
use alloy_transport_http::Http;
use async_trait::async_trait;

use crate::convert::hex_to_u64;
use crate::errors::ProviderError;
use crate::transport::{LoggingLayer, RequestStats, Throttle, ThrottleLayer};
use crate::types::transaction::{RawBlock, RawReceipt};

use super::config::ProviderConfig;
use super::ChainDataProvider;

/// Chain data from any Ethereum JSON-RPC endpoint
///
/// Uses raw requests rather than a typed provider so numeric fields stay the
/// hex strings the node sent; the enricher parses them.
///
/// # Example
///
/// ```rust,ignore
/// use txfilter::provider::{ChainDataProvider, ProviderConfig, RpcChainProvider};
///
/// let provider = RpcChainProvider::new(ProviderConfig::rpc_node("http://localhost:8545"))?;
/// let height = provider.current_height().await?;
/// ```
#[derive(Debug, Clone)]
pub struct RpcChainProvider {
    client: RpcClient,
    stats: RequestStats,
}

impl RpcChainProvider {
    /// Connect to the node at `config.url`
    ///
    /// Requests are throttled to `config.rate_limit_per_second` and time out
    /// after `config.timeout`.
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        Self::with_stats(config, RequestStats::default())
    }

    /// Connect, recording requests into `stats`
    pub fn with_stats(config: ProviderConfig, stats: RequestStats) -> Result<Self, ProviderError> {
        let url = config.endpoint()?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ProviderError::http("client setup", e))?;

        let client = ClientBuilder::default()
            .layer(ThrottleLayer::new(Throttle::per_second(
                config.rate_limit_per_second,
            )))
            .layer(LoggingLayer::new(stats.clone()))
            .transport(Http::with_client(http, url), false);

        Ok(Self { client, stats })
    }

    /// Requests made through this provider
    pub fn stats(&self) -> &RequestStats {
        &self.stats
    }
}

/// Map an Alloy transport error onto the provider error of the failed call
fn map_rpc_error(operation: &str, error: TransportError) -> ProviderError {
    match error {
        RpcError::ErrorResp(payload) => ProviderError::Rpc {
            operation: operation.to_string(),
            code: payload.code,
            message: payload.message.to_string(),
        },
        RpcError::DeserError { err, .. } => ProviderError::decode(operation, err.to_string()),
        other => ProviderError::transport(operation, other),
    }
}

#[async_trait]
impl ChainDataProvider for RpcChainProvider {
    async fn current_height(&self) -> Result<BlockNumber, ProviderError> {
        const OP: &str = "eth_blockNumber";
        let hex: String = self
            .client
            .request_noparams(OP)
            .await
            .map_err(|e| map_rpc_error(OP, e))?;
        hex_to_u64(&hex).map_err(|e| ProviderError::malformed_field(OP, e))
    }

    async fn block(&self, height: BlockNumber) -> Result<RawBlock, ProviderError> {
        const OP: &str = "eth_getBlockByNumber";
        let block: Option<RawBlock> = self
            .client
            .request(OP, (format!("{height:#x}"), true))
            .await
            .map_err(|e| map_rpc_error(OP, e))?;
        block.ok_or(ProviderError::BlockNotFound {
            block_number: height,
        })
    }

    async fn receipt(&self, tx_hash: &str) -> Result<RawReceipt, ProviderError> {
        const OP: &str = "eth_getTransactionReceipt";
        let receipt: Option<RawReceipt> = self
            .client
            .request(OP, (tx_hash.to_string(),))
            .await
            .map_err(|e| map_rpc_error(OP, e))?;
        receipt.ok_or_else(|| ProviderError::ReceiptNotFound {
            tx_hash: tx_hash.to_string(),
        })
    }
}
