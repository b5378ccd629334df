// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Backend selection for a run
//!
//! [`Backends`] describes where chain data and the exchange rate come from;
//! [`connect`] turns it into type-erased providers.

use std::sync::Arc;

use tracing::info;

use crate::errors::ProviderError;
use crate::price::FixedExchangeRate;
use crate::transport::RequestStats;
use crate::types::rate::ExchangeRate;

use super::config::ProviderConfig;
use super::etherscan::EtherscanClient;
use super::rpc::RpcChainProvider;
use super::{ChainDataProvider, ExchangeRateSource};

/// Where blocks and receipts come from
#[derive(Debug, Clone)]
pub enum ChainBackend {
    /// Etherscan's `proxy` module
    Etherscan(ProviderConfig),
    /// A JSON-RPC node
    Rpc(ProviderConfig),
}

/// Where the exchange rate comes from
#[derive(Debug, Clone)]
pub enum RateBackend {
    /// Etherscan's `stats/ethprice`
    Etherscan(ProviderConfig),
    /// A rate fixed for the whole run
    Fixed(ExchangeRate),
}

/// Both backends of a run
#[derive(Debug, Clone)]
pub struct Backends {
    /// Chain data backend
    pub chain: ChainBackend,
    /// Exchange rate backend
    pub rate: RateBackend,
}

/// Connected providers plus the counter their requests are recorded in
pub struct Connected {
    /// Chain data provider
    pub chain: Arc<dyn ChainDataProvider>,
    /// Exchange rate source
    pub rates: Arc<dyn ExchangeRateSource>,
    /// Requests made by either provider
    pub stats: RequestStats,
}

impl std::fmt::Debug for Connected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connected")
            .field("requests", &self.stats.requests())
            .finish_non_exhaustive()
    }
}

/// Build the providers described by `backends`
///
/// When chain data and the rate both come from Etherscan with the same
/// endpoint, one client serves both so they share a throttle.
///
/// # Errors
///
/// Fails if a URL is malformed, the Etherscan API key is missing, or an HTTP
/// client cannot be built. No request is made.
pub fn connect(backends: Backends) -> Result<Connected, ProviderError> {
    let stats = RequestStats::default();

    let (chain, shared): (Arc<dyn ChainDataProvider>, Option<Arc<EtherscanClient>>) =
        match backends.chain {
            ChainBackend::Etherscan(config) => {
                info!(url = %config.url, chain_id = config.chain.id(), "Using Etherscan for chain data");
                let client =
                    Arc::new(EtherscanClient::new(config.clone())?.with_stats(stats.clone()));
                let shared = match &backends.rate {
                    RateBackend::Etherscan(rate_config) if same_endpoint(&config, rate_config) => {
                        Some(client.clone())
                    }
                    _ => None,
                };
                let chain: Arc<dyn ChainDataProvider> = client;
                (chain, shared)
            }
            ChainBackend::Rpc(config) => {
                info!(url = %config.url, "Using JSON-RPC node for chain data");
                let chain: Arc<dyn ChainDataProvider> =
                    Arc::new(RpcChainProvider::with_stats(config, stats.clone())?);
                (chain, None)
            }
        };

    let rates: Arc<dyn ExchangeRateSource> = match (backends.rate, shared) {
        (RateBackend::Fixed(rate), _) => {
            info!(%rate, "Using fixed exchange rate");
            Arc::new(FixedExchangeRate::new(rate))
        }
        (RateBackend::Etherscan(_), Some(client)) => client,
        (RateBackend::Etherscan(config), None) => {
            info!(url = %config.url, "Using Etherscan for the exchange rate");
            Arc::new(EtherscanClient::new(config)?.with_stats(stats.clone()))
        }
    };

    Ok(Connected {
        chain,
        rates,
        stats,
    })
}

fn same_endpoint(a: &ProviderConfig, b: &ProviderConfig) -> bool {
    a.url == b.url && a.api_key == b.api_key && a.chain == b.chain
}
