//! Configuration for scan runs
//!
//! [`ScanConfig`] holds everything the pipeline needs that is not a remote
//! data source: the filter, the block range request, output settings and
//! concurrency. It is built explicitly and injected; nothing in the library
//! reads the process environment.
//!
//! [`EnvSettings`] gathers the secrets and endpoints the binary takes from the
//! environment, through a caller-supplied lookup.
//!
//! # Example: Using defaults
//!
//! ```rust
//! use txfilter::ScanConfig;
//!
//! // One block at the chain head, 1 ETH threshold, written to out.csv
//! let config = ScanConfig::default();
//! assert_eq!(config.num_blocks, 1);
//! ```
//!
//! # Example: Custom configuration
//!
//! ```rust
//! use bigdecimal::BigDecimal;
//! use txfilter::{Currency, FilterCriterion, RateRefresh, RequestedBlock, ScanConfigBuilder};
//!
//! let config = ScanConfigBuilder::with_defaults()
//!     .filter(FilterCriterion::new(BigDecimal::from(10_000), Currency::Usd))
//!     .last_block(RequestedBlock::Number(19_000_000))
//!     .num_blocks(50)
//!     .max_concurrent_blocks(4)
//!     .rate_refresh(RateRefresh::EveryBlocks(25))
//!     .build()
//!     .unwrap();
//! assert_eq!(config.output.to_str(), Some("out.csv"));
//! ```

use std::path::PathBuf;

use bigdecimal::BigDecimal;

use crate::blocks::{RateRefresh, RequestedBlock};
use crate::enrich::FilterCriterion;
use crate::errors::ConfigError;
use crate::export::{output_path, Column};

pub mod constants;

use constants::{env, DEFAULT_ETHERSCAN_URL, DEFAULT_OUTPUT};

/// Settings for one scan run
///
/// Use [`ScanConfigBuilder`] to construct validated instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Value threshold and its currency
    pub filter: FilterCriterion,

    /// Last block to scan
    pub last_block: RequestedBlock,

    /// Number of blocks ending at `last_block`
    /// Default: 1
    pub num_blocks: u64,

    /// Destination of the result file
    /// Default: `out.csv`
    pub output: PathBuf,

    /// Columns written, in order
    /// Default: [`Column::ALL`]
    pub columns: Vec<Column>,

    /// Block fetches in flight at once
    /// Default: 1 (sequential)
    pub max_concurrent_blocks: usize,

    /// Receipt lookups in flight at once within a block
    /// Default: 1 (sequential)
    pub max_concurrent_receipts: usize,

    /// How often the exchange rate is fetched
    /// Default: once per run
    pub rate_refresh: RateRefresh,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            filter: FilterCriterion::default(),
            last_block: RequestedBlock::Latest,
            num_blocks: 1,
            output: output_path(DEFAULT_OUTPUT),
            columns: Column::ALL.to_vec(),
            max_concurrent_blocks: 1,
            max_concurrent_receipts: 1,
            rate_refresh: RateRefresh::OncePerRun,
        }
    }
}

impl ScanConfig {
    /// Check the invariants the builder enforces
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first rejected field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.filter.minimum <= BigDecimal::from(0) {
            return Err(ConfigError::invalid(
                "amount",
                format!("{} is not a positive number", self.filter.minimum),
            ));
        }
        if self.num_blocks == 0 {
            return Err(ConfigError::invalid("num_blocks", "must be at least 1"));
        }
        if let RequestedBlock::Number(0) = self.last_block {
            return Err(ConfigError::invalid("block", "must be at least 1"));
        }
        if self.columns.is_empty() {
            return Err(ConfigError::invalid("columns", "at least one column is required"));
        }
        if let RateRefresh::EveryBlocks(0) = self.rate_refresh {
            return Err(ConfigError::invalid("rate_refresh_blocks", "must be at least 1"));
        }
        if self.max_concurrent_blocks == 0 || self.max_concurrent_receipts == 0 {
            return Err(ConfigError::invalid("concurrency", "must be at least 1"));
        }
        Ok(())
    }
}

/// Builder for [`ScanConfig`]
///
/// # Example
///
/// ```rust
/// use txfilter::ScanConfigBuilder;
///
/// let err = ScanConfigBuilder::with_defaults().num_blocks(0).build();
/// assert!(err.is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScanConfigBuilder {
    config: ScanConfig,
}

impl ScanConfigBuilder {
    /// Start from [`ScanConfig::default`]
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Set the value filter
    pub fn filter(mut self, filter: FilterCriterion) -> Self {
        self.config.filter = filter;
        self
    }

    /// Set the last block to scan
    pub fn last_block(mut self, last_block: RequestedBlock) -> Self {
        self.config.last_block = last_block;
        self
    }

    /// Set the number of blocks
    pub fn num_blocks(mut self, num_blocks: u64) -> Self {
        self.config.num_blocks = num_blocks;
        self
    }

    /// Set the destination path
    pub fn output(mut self, output: impl Into<PathBuf>) -> Self {
        self.config.output = output.into();
        self
    }

    /// Set the output base name; `.csv` is appended
    pub fn output_base(mut self, base: &str) -> Self {
        self.config.output = output_path(base);
        self
    }

    /// Set the exported columns
    pub fn columns(mut self, columns: impl Into<Vec<Column>>) -> Self {
        self.config.columns = columns.into();
        self
    }

    /// Set the number of blocks fetched concurrently
    pub fn max_concurrent_blocks(mut self, limit: usize) -> Self {
        self.config.max_concurrent_blocks = limit;
        self
    }

    /// Set the number of receipts fetched concurrently within a block
    pub fn max_concurrent_receipts(mut self, limit: usize) -> Self {
        self.config.max_concurrent_receipts = limit;
        self
    }

    /// Set the rate refresh policy
    pub fn rate_refresh(mut self, rate_refresh: RateRefresh) -> Self {
        self.config.rate_refresh = rate_refresh;
        self
    }

    /// Validate and build
    pub fn build(self) -> Result<ScanConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Endpoints and secrets taken from the environment
#[derive(Clone, PartialEq, Eq)]
pub struct EnvSettings {
    /// Etherscan API key (`API_KEY`)
    pub api_key: Option<String>,
    /// Etherscan base URL (`ETHERSCAN_API_URL`, else the public v2 API)
    pub etherscan_url: String,
    /// JSON-RPC node URL (`RPC_URL`)
    pub rpc_url: Option<String>,
}

impl EnvSettings {
    /// Read settings through `lookup`, which maps a variable name to its value
    ///
    /// Empty values count as unset.
    ///
    /// ```rust
    /// use txfilter::config::EnvSettings;
    ///
    /// let settings = EnvSettings::from_lookup(|name| (name == "API_KEY").then(|| "KEY".to_string()));
    /// assert_eq!(settings.api_key.as_deref(), Some("KEY"));
    /// assert!(settings.rpc_url.is_none());
    /// ```
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        Self {
            api_key: read(env::API_KEY),
            etherscan_url: read(env::ETHERSCAN_API_URL)
                .unwrap_or_else(|| DEFAULT_ETHERSCAN_URL.to_string()),
            rpc_url: read(env::RPC_URL),
        }
    }

    /// The Etherscan API key, or an error naming the missing variable
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .ok_or(ConfigError::MissingEnvVar(env::API_KEY))
    }
}

impl std::fmt::Debug for EnvSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("etherscan_url", &self.etherscan_url)
            .field("rpc_url", &self.rpc_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::Currency;
    use std::collections::HashMap;

    #[test]
    fn test_default_config_is_valid() {
        let config = ScanConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.output, PathBuf::from("out.csv"));
        assert_eq!(config.columns, Column::ALL.to_vec());
        assert_eq!(config.last_block, RequestedBlock::Latest);
    }

    #[test]
    fn test_builder_sets_fields() {
        let config = ScanConfigBuilder::with_defaults()
            .num_blocks(10)
            .output_base("big")
            .max_concurrent_receipts(8)
            .build()
            .unwrap();
        assert_eq!(config.num_blocks, 10);
        assert_eq!(config.output, PathBuf::from("big.csv"));
        assert_eq!(config.max_concurrent_receipts, 8);
    }

    #[test]
    fn test_rejects_non_positive_amount() {
        let err = ScanConfigBuilder::with_defaults()
            .filter(FilterCriterion::new(BigDecimal::from(0), Currency::Usd))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "amount", .. }));
    }

    #[test]
    fn test_rejects_block_zero_and_empty_columns() {
        assert!(ScanConfigBuilder::with_defaults()
            .last_block(RequestedBlock::Number(0))
            .build()
            .is_err());
        assert!(ScanConfigBuilder::with_defaults()
            .columns(Vec::new())
            .build()
            .is_err());
        assert!(ScanConfigBuilder::with_defaults()
            .rate_refresh(RateRefresh::EveryBlocks(0))
            .build()
            .is_err());
    }

    #[test]
    fn test_env_settings_defaults() {
        let settings = EnvSettings::from_lookup(|_| None);
        assert_eq!(settings.etherscan_url, DEFAULT_ETHERSCAN_URL);
        assert_eq!(
            settings.require_api_key().unwrap_err(),
            ConfigError::MissingEnvVar("API_KEY")
        );
    }

    #[test]
    fn test_env_settings_overrides() {
        let vars: HashMap<&str, &str> = [
            ("API_KEY", "SECRET"),
            ("ETHERSCAN_API_URL", "http://localhost:9000/api"),
            ("RPC_URL", ""),
        ]
        .into_iter()
        .collect();
        let settings = EnvSettings::from_lookup(|name| vars.get(name).map(|v| v.to_string()));
        assert_eq!(settings.require_api_key().unwrap(), "SECRET");
        assert_eq!(settings.etherscan_url, "http://localhost:9000/api");
        assert!(settings.rpc_url.is_none());
        assert!(!format!("{settings:?}").contains("SECRET"));
    }
}
