// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! End-to-end scan orchestration
//!
//! A run reads the chain height once, resolves the block range against it,
//! walks the range (fetching the exchange rate per [`RateRefresh`] group) and
//! writes the accepted records. Any failure aborts the run before the result
//! file is created.
//!
//! [`RateRefresh`]: crate::blocks::RateRefresh

use std::path::PathBuf;

use alloy_primitives::BlockNumber;
use tracing::{info, Instrument};

use crate::blocks::{resolve_range, BlockRange, BlockWalker, RatedGroup};
use crate::config::ScanConfig;
use crate::enrich::TransactionEnricher;
use crate::errors::ScanError;
use crate::export::CsvExporter;
use crate::provider::{ChainDataProvider, ExchangeRateSource};
use crate::tracing::spans;
use crate::types::transaction::EnrichedTransaction;

/// Records collected by a run, before export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Chain height read at the start of the run
    pub current_height: BlockNumber,
    /// Blocks scanned
    pub range: BlockRange,
    /// Accepted records, block-ascending then in-block order
    pub records: Vec<EnrichedTransaction>,
    /// Transactions seen, accepted or not
    pub transactions_scanned: usize,
    /// Exchange rates used, per group of blocks
    pub rate_groups: Vec<RatedGroup>,
}

/// Summary of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanReport {
    /// Chain height read at the start of the run
    pub current_height: BlockNumber,
    /// Blocks scanned
    pub range: BlockRange,
    /// Exchange rates used, per group of blocks
    pub rate_groups: Vec<RatedGroup>,
    /// Transactions seen, accepted or not
    pub transactions_scanned: usize,
    /// Rows written
    pub records_written: usize,
    /// Path of the result file
    pub output_path: PathBuf,
}

impl std::fmt::Display for ScanReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "scanned {} transactions in blocks {}, wrote {} to {}",
            self.transactions_scanned,
            self.range,
            self.records_written,
            self.output_path.display()
        )
    }
}

/// Runs a scan against a chain data provider and an exchange rate source
///
/// # Example
///
/// ```rust,ignore
/// use txfilter::{ScanConfig, ScanPipeline};
/// use txfilter::provider::{connect, Backends};
///
/// let connected = connect(backends)?;
/// let pipeline = ScanPipeline::new(ScanConfig::default(), connected.chain, connected.rates);
/// let report = pipeline.run().await?;
/// println!("{report}");
/// ```
#[derive(Debug)]
pub struct ScanPipeline<C, R> {
    config: ScanConfig,
    chain: C,
    rates: R,
}

impl<C, R> ScanPipeline<C, R>
where
    C: ChainDataProvider,
    R: ExchangeRateSource,
{
    /// Create a pipeline
    pub fn new(config: ScanConfig, chain: C, rates: R) -> Self {
        Self {
            config,
            chain,
            rates,
        }
    }

    /// Run everything except the export
    ///
    /// # Errors
    ///
    /// Configuration, range, provider and conversion errors, in the order
    /// they occur. Invalid configuration is rejected before any remote call.
    pub async fn collect(&self) -> Result<ScanOutcome, ScanError> {
        self.config.validate()?;

        let current_height = self.chain.current_height().await?;
        let range = resolve_range(
            self.config.last_block,
            self.config.num_blocks,
            current_height,
        )?;
        info!(
            current_height,
            requested = %self.config.last_block,
            %range,
            "Resolved block range"
        );

        let enricher = TransactionEnricher::new(self.config.filter.clone())
            .with_receipt_concurrency(self.config.max_concurrent_receipts);
        let walker = BlockWalker::new(enricher)
            .with_block_concurrency(self.config.max_concurrent_blocks)
            .with_rate_refresh(self.config.rate_refresh);

        let output = walker
            .walk(range, &self.chain, &self.rates)
            .instrument(spans::scan_run(range.start(), range.end()))
            .await?;

        info!(
            transactions = output.transactions_scanned,
            accepted = output.records.len(),
            "Scan complete"
        );

        Ok(ScanOutcome {
            current_height,
            range,
            records: output.records,
            transactions_scanned: output.transactions_scanned,
            rate_groups: output.groups,
        })
    }

    /// Run the scan and write the result file
    ///
    /// # Errors
    ///
    /// Everything [`collect`](Self::collect) can return, plus export errors.
    /// No file exists at the destination unless the run succeeds.
    pub async fn run(&self) -> Result<ScanReport, ScanError> {
        let outcome = self.collect().await?;

        let records_written = {
            let _guard = spans::export_records(outcome.records.len()).entered();
            CsvExporter.export(&outcome.records, &self.config.columns, &self.config.output)?
        };

        Ok(ScanReport {
            current_height: outcome.current_height,
            range: outcome.range,
            rate_groups: outcome.rate_groups,
            transactions_scanned: outcome.transactions_scanned,
            records_written,
            output_path: self.config.output.clone(),
        })
    }
}
