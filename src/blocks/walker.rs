//! Ordered traversal of a block range
//!
//! [`BlockWalker`] fetches every block of a range, hands its transactions to
//! the [`TransactionEnricher`] and concatenates the accepted records
//! block-ascending, then in on-chain order within each block.
//!
//! Several blocks may be in flight at once, but results are re-assembled with
//! an order-preserving buffered stream, so concurrency never changes the
//! output. The first failure cancels whatever is still outstanding.

use alloy_primitives::BlockNumber;
use futures::{stream, StreamExt, TryStreamExt};
use tracing::{debug, info, Instrument};

use crate::enrich::TransactionEnricher;
use crate::errors::ScanError;
use crate::provider::{ChainDataProvider, ExchangeRateSource};
use crate::tracing::spans;
use crate::types::rate::ExchangeRate;
use crate::types::transaction::EnrichedTransaction;

use super::range::BlockRange;

/// How often the exchange rate is fetched during a walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RateRefresh {
    /// One rate for the whole run
    #[default]
    OncePerRun,
    /// A fresh rate before each group of this many blocks
    EveryBlocks(u64),
}

impl RateRefresh {
    /// Blocks sharing one rate, given the range being walked
    fn group_size(self, range: &BlockRange) -> u64 {
        match self {
            RateRefresh::OncePerRun => range.len(),
            RateRefresh::EveryBlocks(n) => n.max(1),
        }
    }
}

/// A group of consecutive blocks and the rate their records were valued at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatedGroup {
    /// Blocks in the group
    pub range: BlockRange,
    /// Rate applied to every record of the group
    pub rate: ExchangeRate,
}

/// Result of walking a range
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkOutput {
    /// Accepted records, in output order
    pub records: Vec<EnrichedTransaction>,
    /// Transactions seen, accepted or not
    pub transactions_scanned: usize,
    /// Rate groups in ascending block order
    pub groups: Vec<RatedGroup>,
}

/// Records and transaction count of a single block
struct BlockScan {
    records: Vec<EnrichedTransaction>,
    transactions: usize,
}

/// Walks a block range in ascending order
///
/// # Example
///
/// ```rust,ignore
/// use txfilter::{BlockWalker, FilterCriterion, RateRefresh, TransactionEnricher};
///
/// let walker = BlockWalker::new(TransactionEnricher::new(FilterCriterion::default()))
///     .with_block_concurrency(4)
///     .with_rate_refresh(RateRefresh::EveryBlocks(100));
/// let output = walker.walk(range, &chain, &rates).await?;
/// ```
#[derive(Debug, Clone)]
pub struct BlockWalker {
    enricher: TransactionEnricher,
    max_concurrent_blocks: usize,
    rate_refresh: RateRefresh,
}

impl BlockWalker {
    /// Create a sequential walker with one rate per run
    pub fn new(enricher: TransactionEnricher) -> Self {
        Self {
            enricher,
            max_concurrent_blocks: 1,
            rate_refresh: RateRefresh::OncePerRun,
        }
    }

    /// Allow up to `limit` block fetches in flight; zero is treated as one
    pub fn with_block_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrent_blocks = limit.max(1);
        self
    }

    /// Set the rate refresh policy
    pub fn with_rate_refresh(mut self, rate_refresh: RateRefresh) -> Self {
        self.rate_refresh = rate_refresh;
        self
    }

    /// Walk `range`, fetching blocks and receipts from `chain` and rates from `rates`
    ///
    /// # Errors
    ///
    /// The first provider, conversion or rate error aborts the walk; no
    /// partial output is returned.
    pub async fn walk<C, R>(
        &self,
        range: BlockRange,
        chain: &C,
        rates: &R,
    ) -> Result<WalkOutput, ScanError>
    where
        C: ChainDataProvider + ?Sized,
        R: ExchangeRateSource + ?Sized,
    {
        let mut output = WalkOutput::default();

        for group in range.chunks(self.rate_refresh.group_size(&range)) {
            let rate = rates
                .exchange_rate()
                .instrument(spans::fetch_exchange_rate(group.start()))
                .await?;
            info!(blocks = %group, %rate, "Fetched exchange rate");

            let scans: Vec<BlockScan> = stream::iter(group.heights())
                .map(|height| self.scan_block(height, &rate, chain))
                .buffered(self.max_concurrent_blocks)
                .try_collect()
                .await?;

            for scan in scans {
                output.transactions_scanned += scan.transactions;
                output.records.extend(scan.records);
            }
            output.groups.push(RatedGroup { range: group, rate });
        }

        Ok(output)
    }

    async fn scan_block<C>(
        &self,
        height: BlockNumber,
        rate: &ExchangeRate,
        chain: &C,
    ) -> Result<BlockScan, ScanError>
    where
        C: ChainDataProvider + ?Sized,
    {
        async {
            let block = chain.block(height).await?;
            let transactions = block.transactions.len();
            let records = self
                .enricher
                .enrich_block(block.transactions, rate, chain)
                .await?;
            debug!(transactions, accepted = records.len(), "Scanned block");
            Ok::<_, ScanError>(BlockScan {
                records,
                transactions,
            })
        }
        .instrument(spans::scan_block(height))
        .await
    }
}
