//! # txfilter
//!
//! Scan a contiguous range of EVM blocks, keep the transactions whose value
//! meets a threshold in ETH or USD, attach their gas fees, and export them to
//! CSV.
//!
//! ## Pipeline
//!
//! 1. Read the chain height once and resolve the requested block range
//!    against it ([`resolve_range`])
//! 2. Fetch the USD per ETH rate ([`ExchangeRateSource`])
//! 3. Walk the range block-ascending ([`BlockWalker`]), valuing every
//!    transaction and looking up receipts only for those that pass the
//!    [`FilterCriterion`] ([`TransactionEnricher`])
//! 4. Write the accepted records ([`CsvExporter`])
//!
//! All amounts are exact decimals: hex quantities are parsed into
//! [`BigDecimal`](bigdecimal::BigDecimal) and scaled by powers of ten, never
//! rounded.
//!
//! ## Example
//!
//! ```rust,ignore
//! use txfilter::provider::{EtherscanClient, ProviderConfig};
//! use txfilter::{ScanConfig, ScanPipeline};
//! use std::sync::Arc;
//!
//! let client = Arc::new(EtherscanClient::new(ProviderConfig::etherscan(url, api_key))?);
//! let pipeline = ScanPipeline::new(ScanConfig::default(), client.clone(), client);
//! let report = pipeline.run().await?;
//! println!("{report}");
//! ```

pub mod blocks;
pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod convert;
pub mod enrich;
pub mod errors;
pub mod export;
pub mod pipeline;
pub mod price;
pub mod provider;
mod tracing;
pub mod transport;
pub mod types;

pub use blocks::{resolve_range, BlockRange, BlockWalker, RateRefresh, RequestedBlock, WalkOutput};
pub use config::{ScanConfig, ScanConfigBuilder};
pub use convert::{
    format_decimal, hex_to_decimal, hex_to_u256, hex_to_u64, to_whole_unit, Unit, ETHER_EXPONENT,
    GWEI_EXPONENT,
};
pub use enrich::{Currency, FilterCriterion, TransactionEnricher};
pub use errors::{
    BlockRangeError, ConfigError, ConversionError, ExportError, ProviderError, ScanError,
};
pub use export::{output_path, Column, CsvExporter};
pub use pipeline::{ScanOutcome, ScanPipeline, ScanReport};
pub use provider::{ChainDataProvider, ExchangeRateSource};
pub use types::rate::ExchangeRate;
pub use types::transaction::{EnrichedTransaction, FeeBreakdown, RawBlock, RawReceipt, RawTransaction};
pub use types::wei::WeiAmount;
