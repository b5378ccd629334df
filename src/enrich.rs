// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Transaction valuation, filtering and fee enrichment
//!
//! Enrichment runs in two stages so that the expensive part only happens for
//! transactions worth reporting:
//!
//! 1. [`TransactionEnricher::value_transaction`] converts the value into ETH
//!    and USD and is a pure function of the transaction and the rate.
//! 2. For transactions that pass the [`FilterCriterion`], the receipt is
//!    fetched and [`TransactionEnricher::complete_fee`] attaches the gas price
//!    and fee in both currencies.
//!
//! Rejected transactions never trigger a receipt lookup.

use bigdecimal::BigDecimal;
use futures::{stream, StreamExt, TryStreamExt};
use std::str::FromStr;
use tracing::{trace, Instrument};

use crate::convert::{hex_to_decimal, hex_to_u64, to_whole_unit, GWEI_EXPONENT};
use crate::errors::{ConfigError, ScanError};
use crate::provider::ChainDataProvider;
use crate::tracing::spans;
use crate::types::rate::ExchangeRate;
use crate::types::transaction::{EnrichedTransaction, FeeBreakdown, RawTransaction};
use crate::types::wei::WeiAmount;

/// Currency the value threshold is expressed in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Currency {
    /// Native coin
    #[default]
    Eth,
    /// US dollars, through the run's exchange rate
    Usd,
}

impl Currency {
    /// Ticker used on the command line and in logs
    pub const fn symbol(self) -> &'static str {
        match self {
            Currency::Eth => "ETH",
            Currency::Usd => "USD",
        }
    }
}

impl FromStr for Currency {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ETH" => Ok(Currency::Eth),
            "USD" => Ok(Currency::Usd),
            other => Err(ConfigError::invalid(
                "currency",
                format!("expected USD or ETH, got '{other}'"),
            )),
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Minimum value a transaction must carry to be reported
///
/// The boundary is inclusive: a transaction worth exactly `minimum` passes.
///
/// ```
/// use bigdecimal::BigDecimal;
/// use txfilter::{Currency, FilterCriterion};
///
/// let filter = FilterCriterion::new(BigDecimal::from(1), Currency::Eth);
/// assert!(filter.accepts_values(&BigDecimal::from(1), &BigDecimal::from(2000)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriterion {
    /// Threshold, in `currency`
    pub minimum: BigDecimal,
    /// Currency the threshold applies to
    pub currency: Currency,
}

impl FilterCriterion {
    /// Create a filter
    pub fn new(minimum: BigDecimal, currency: Currency) -> Self {
        Self { minimum, currency }
    }

    /// Decide inclusion given a value in both currencies
    pub fn accepts_values(&self, value_eth: &BigDecimal, value_usd: &BigDecimal) -> bool {
        let value = match self.currency {
            Currency::Eth => value_eth,
            Currency::Usd => value_usd,
        };
        value >= &self.minimum
    }

    /// Decide inclusion for a valued transaction
    pub fn accepts(&self, tx: &EnrichedTransaction) -> bool {
        self.accepts_values(&tx.value_eth, &tx.value_usd)
    }
}

impl Default for FilterCriterion {
    /// One ETH, matching the command-line defaults
    fn default() -> Self {
        Self::new(BigDecimal::from(1), Currency::Eth)
    }
}

/// Applies the value filter and attaches fee data to accepted transactions
#[derive(Debug, Clone)]
pub struct TransactionEnricher {
    filter: FilterCriterion,
    max_concurrent_receipts: usize,
}

impl TransactionEnricher {
    /// Create an enricher that looks receipts up one at a time
    pub fn new(filter: FilterCriterion) -> Self {
        Self {
            filter,
            max_concurrent_receipts: 1,
        }
    }

    /// Allow up to `limit` receipt lookups in flight within one block
    ///
    /// Output order is unaffected; zero is treated as one.
    pub fn with_receipt_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrent_receipts = limit.max(1);
        self
    }

    /// Value a transaction in ETH and USD, without fee data
    ///
    /// Only `value` is read here. `block_number` stays zero until
    /// [`complete_fee`](Self::complete_fee) runs.
    ///
    /// # Errors
    ///
    /// Fails if `value` is not a valid hex quantity.
    pub fn value_transaction(
        &self,
        raw: RawTransaction,
        rate: &ExchangeRate,
    ) -> Result<EnrichedTransaction, ScanError> {
        let value_eth = WeiAmount::from_hex(&raw.value)?.to_ether()?;
        let value_usd = rate.to_fiat(&value_eth);

        Ok(EnrichedTransaction {
            raw,
            block_number: 0,
            value_eth,
            value_usd,
            fee: None,
        })
    }

    /// Attach block height, gas price and fee, given the receipt's `gasUsed`
    ///
    /// `gas_price_usd` is the price of one unit of gas: the gas price in ETH
    /// times the rate. `fee_eth` is `gas_used * gas_price_gwei / 10^9`.
    ///
    /// # Errors
    ///
    /// Fails if `blockNumber`, `gasPrice` or `gas_used_hex` is not a valid hex
    /// quantity.
    pub fn complete_fee(
        &self,
        mut tx: EnrichedTransaction,
        gas_used_hex: &str,
        rate: &ExchangeRate,
    ) -> Result<EnrichedTransaction, ScanError> {
        tx.block_number = hex_to_u64(&tx.raw.block_number)?;
        let gas_price = WeiAmount::from_hex(&tx.raw.gas_price)?;
        let gas_price_gwei = gas_price.to_gwei()?;
        let gas_price_usd = rate.to_fiat(&gas_price.to_ether()?);

        let gas_used = hex_to_decimal(gas_used_hex)?;
        let fee_eth = to_whole_unit(&(&gas_used * &gas_price_gwei), GWEI_EXPONENT);
        let fee_usd = rate.to_fiat(&fee_eth);

        tx.fee = Some(FeeBreakdown {
            gas_price_gwei,
            gas_price_usd,
            gas_used,
            fee_eth,
            fee_usd,
        });
        Ok(tx)
    }

    /// Enrich one transaction, looking up its receipt only if it passes the filter
    ///
    /// Returns `Ok(None)` for rejected transactions. A failed receipt lookup
    /// is an error, not a skipped transaction.
    pub async fn enrich<C>(
        &self,
        raw: RawTransaction,
        rate: &ExchangeRate,
        receipts: &C,
    ) -> Result<Option<EnrichedTransaction>, ScanError>
    where
        C: ChainDataProvider + ?Sized,
    {
        let valued = self.value_transaction(raw, rate)?;
        if !self.filter.accepts(&valued) {
            trace!(tx_hash = %valued.hash(), "below threshold");
            return Ok(None);
        }
        self.attach_receipt(valued, rate, receipts).await.map(Some)
    }

    /// Enrich every transaction of a block, keeping their original order
    ///
    /// All transactions are valued first; receipts are then fetched for the
    /// accepted ones with up to `max_concurrent_receipts` lookups in flight.
    /// The first failure cancels the remaining lookups.
    pub async fn enrich_block<C>(
        &self,
        transactions: Vec<RawTransaction>,
        rate: &ExchangeRate,
        receipts: &C,
    ) -> Result<Vec<EnrichedTransaction>, ScanError>
    where
        C: ChainDataProvider + ?Sized,
    {
        let mut accepted = Vec::new();
        for raw in transactions {
            let valued = self.value_transaction(raw, rate)?;
            if self.filter.accepts(&valued) {
                accepted.push(valued);
            }
        }

        stream::iter(accepted)
            .map(|tx| self.attach_receipt(tx, rate, receipts))
            .buffered(self.max_concurrent_receipts)
            .try_collect()
            .await
    }

    async fn attach_receipt<C>(
        &self,
        tx: EnrichedTransaction,
        rate: &ExchangeRate,
        receipts: &C,
    ) -> Result<EnrichedTransaction, ScanError>
    where
        C: ChainDataProvider + ?Sized,
    {
        let span = spans::fetch_receipt(tx.hash());
        let receipt = receipts.receipt(tx.hash()).instrument(span).await?;
        self.complete_fee(tx, &receipt.gas_used, rate)
    }
}
