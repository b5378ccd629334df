//! Exchange rate sources that need no network
//!
//! The remote source is [`EtherscanClient`](crate::provider::EtherscanClient);
//! [`FixedExchangeRate`] serves a rate supplied by the operator, for offline
//! runs or reproducible reports.
//!
//! # Example
//!
//! ```rust
//! use txfilter::price::FixedExchangeRate;
//! use txfilter::ExchangeRate;
//!
//! let source = FixedExchangeRate::new(ExchangeRate::parse("2000").unwrap());
//! assert_eq!(source.rate().to_string(), "2000 USD/ETH");
//! ```

use async_trait::async_trait;

use crate::errors::ProviderError;
use crate::provider::ExchangeRateSource;
use crate::types::rate::ExchangeRate;

/// An [`ExchangeRateSource`] that always returns the same rate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedExchangeRate {
    rate: ExchangeRate,
}

impl FixedExchangeRate {
    /// Serve `rate` for every request
    pub fn new(rate: ExchangeRate) -> Self {
        Self { rate }
    }

    /// The rate served
    pub fn rate(&self) -> &ExchangeRate {
        &self.rate
    }
}

#[async_trait]
impl ExchangeRateSource for FixedExchangeRate {
    async fn exchange_rate(&self) -> Result<ExchangeRate, ProviderError> {
        Ok(self.rate.clone())
    }
}
