//! Span creation helpers for scan operations.
//!
//! Telemetry stays out of the business logic: each instrumented operation has
//! a helper here, and callers attach it with `.instrument(span)`.
//!
//! Usage pattern:
//! ```rust,ignore
//! let span = spans::scan_block(height);
//! walker.process(height).instrument(span).await?;
//! ```

use alloy_primitives::BlockNumber;
use tracing::{Level, Span};

/// Create span for a whole scan run.
///
/// Parent: None (root span for this operation)
/// Children: scan_block spans (one per block)
#[inline]
pub(crate) fn scan_run(start_block: BlockNumber, end_block: BlockNumber) -> Span {
    tracing::span!(
        Level::INFO,
        "txfilter.scan_run",
        start_block = start_block,
        end_block = end_block,
    )
}

/// Create span for fetching and enriching one block.
///
/// Parent: scan_run span
/// Children: fetch_receipt spans (one per accepted transaction)
#[inline]
pub(crate) fn scan_block(block_number: BlockNumber) -> Span {
    tracing::debug_span!("txfilter.scan_block", block_number = block_number)
}

/// Create span for the receipt lookup of an accepted transaction.
#[inline]
pub(crate) fn fetch_receipt(tx_hash: &str) -> Span {
    tracing::trace_span!("txfilter.fetch_receipt", tx_hash = %tx_hash)
}

/// Create span for fetching the exchange rate.
#[inline]
pub(crate) fn fetch_exchange_rate(first_block: BlockNumber) -> Span {
    tracing::debug_span!("txfilter.fetch_exchange_rate", first_block = first_block)
}

/// Create span for writing the result file.
#[inline]
pub(crate) fn export_records(records: usize) -> Span {
    tracing::info_span!("txfilter.export_records", records = records)
}
