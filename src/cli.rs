//! Command-line arguments
//!
//! Short flags (`-a`, `-c`, `-b`, `-n`, `-o`) describe the scan; long-only
//! flags select backends and tune concurrency.
//!
//! ```text
//! txfilter -a 10000 -c USD -n 20 -o whales
//! txfilter --backend rpc --rpc-url http://localhost:8545 --eth-usd 2000 -b 19000000
//! ```

use std::str::FromStr;
use std::time::Duration;

use alloy_chains::Chain;
use bigdecimal::BigDecimal;
use clap::{Parser, ValueEnum};

use crate::blocks::{RateRefresh, RequestedBlock};
use crate::config::constants::{env, DEFAULT_OUTPUT};
use crate::config::{EnvSettings, ScanConfig, ScanConfigBuilder};
use crate::enrich::{Currency, FilterCriterion};
use crate::errors::ConfigError;
use crate::provider::{Backends, ChainBackend, ProviderConfig, RateBackend};
use crate::types::rate::ExchangeRate;

/// Where chain data comes from
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Backend {
    /// Etherscan's HTTP API (needs API_KEY)
    #[default]
    Etherscan,
    /// A JSON-RPC node (needs --rpc-url or RPC_URL)
    Rpc,
}

/// Arguments of the `txfilter` binary
#[derive(Parser, Debug, Clone)]
#[command(
    name = "txfilter",
    author,
    version,
    about = "Export high-value transactions from a range of EVM blocks to CSV",
    long_about = None
)]
pub struct Args {
    /// Minimum transaction value to export
    #[arg(short, long, default_value = "1", value_parser = parse_positive_decimal)]
    pub amount: BigDecimal,

    /// Currency the amount is expressed in (USD or ETH)
    #[arg(short, long, default_value = "ETH")]
    pub currency: Currency,

    /// Last block to scan [default: latest]
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    pub block: Option<u64>,

    /// Number of blocks to scan, ending at --block
    #[arg(
        short = 'n',
        long = "num_blocks",
        default_value_t = 1,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub num_blocks: u64,

    /// Output file name; .csv is appended
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: String,

    /// Chain data backend
    #[arg(long, value_enum, default_value_t = Backend::Etherscan)]
    pub backend: Backend,

    /// JSON-RPC node URL for the rpc backend [env: RPC_URL]
    #[arg(long)]
    pub rpc_url: Option<String>,

    /// Chain ID passed to Etherscan's multichain API
    #[arg(long, default_value_t = 1)]
    pub chain_id: u64,

    /// Fixed USD per ETH rate instead of Etherscan's ethprice
    #[arg(long, value_parser = parse_positive_decimal)]
    pub eth_usd: Option<BigDecimal>,

    /// Block fetches and receipt lookups in flight at once
    #[arg(long, default_value_t = 1, value_parser = parse_at_least_one)]
    pub concurrency: usize,

    /// Refresh the exchange rate every this many blocks [default: once per run]
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub rate_refresh_blocks: Option<u64>,

    /// Maximum requests per second to the backend (0 for unlimited)
    /// [default: 5 for Etherscan, unlimited for rpc]
    #[arg(long)]
    pub requests_per_second: Option<u32>,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: u64,

    /// Path to .env file
    #[arg(long, default_value = ".env")]
    pub env_file: String,
}

fn parse_positive_decimal(value: &str) -> Result<BigDecimal, String> {
    let decimal = BigDecimal::from_str(value.trim())
        .map_err(|_| format!("{value} is not a number"))?;
    if decimal <= BigDecimal::from(0) {
        return Err(format!("{value} is not a positive number"));
    }
    Ok(decimal)
}

fn parse_at_least_one(value: &str) -> Result<usize, String> {
    match value.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(format!("{value} is not a positive integer")),
    }
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Build the scan configuration
    pub fn scan_config(&self) -> Result<ScanConfig, ConfigError> {
        let rate_refresh = self
            .rate_refresh_blocks
            .map_or(RateRefresh::OncePerRun, RateRefresh::EveryBlocks);

        ScanConfigBuilder::with_defaults()
            .filter(FilterCriterion::new(self.amount.clone(), self.currency))
            .last_block(RequestedBlock::from(self.block))
            .num_blocks(self.num_blocks)
            .output_base(&self.output)
            .max_concurrent_blocks(self.concurrency)
            .max_concurrent_receipts(self.concurrency)
            .rate_refresh(rate_refresh)
            .build()
    }

    /// Describe the backends, taking endpoints and secrets from `settings`
    ///
    /// # Errors
    ///
    /// Fails if a backend that needs the Etherscan API key or an RPC URL is
    /// selected without one.
    pub fn backends(&self, settings: &EnvSettings) -> Result<Backends, ConfigError> {
        let chain_id = Chain::from_id(self.chain_id);
        let timeout = Duration::from_secs(self.timeout_secs);

        let etherscan = || -> Result<ProviderConfig, ConfigError> {
            let mut config =
                ProviderConfig::etherscan(&settings.etherscan_url, settings.require_api_key()?)
                    .with_chain(chain_id)
                    .with_timeout(timeout);
            if let Some(rps) = self.requests_per_second {
                config = config.with_rate_limit(rps);
            }
            Ok(config)
        };

        let chain = match self.backend {
            Backend::Etherscan => ChainBackend::Etherscan(etherscan()?),
            Backend::Rpc => {
                let url = self
                    .rpc_url
                    .clone()
                    .or_else(|| settings.rpc_url.clone())
                    .ok_or(ConfigError::MissingEnvVar(env::RPC_URL))?;
                ChainBackend::Rpc(
                    ProviderConfig::rpc_node(url)
                        .with_chain(chain_id)
                        .with_timeout(timeout)
                        .with_rate_limit_opt(self.requests_per_second),
                )
            }
        };

        let rate = match &self.eth_usd {
            Some(value) => RateBackend::Fixed(
                ExchangeRate::new(value.clone())
                    .map_err(|e| ConfigError::invalid("eth_usd", e.to_string()))?,
            ),
            None => RateBackend::Etherscan(etherscan()?),
        };

        Ok(Backends { chain, rate })
    }
}
