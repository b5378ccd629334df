// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! CSV export of accepted transactions
//!
//! The default column set, in order, is the output contract:
//!
//! ```text
//! Block number,hash,from,to,Value (ETH),Value (USD),Gas price (Gwei),Gas price (USD),Transaction fee (ETH),Transaction fee (USD)
//! ```
//!
//! Decimals are written in plain notation with trailing zeros trimmed. A
//! contract creation has an empty `to` cell.

use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::info;

use crate::config::constants::CSV_EXTENSION;
use crate::convert::format_decimal;
use crate::errors::ExportError;
use crate::types::transaction::EnrichedTransaction;

/// A column of the result file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    /// Decimal block height
    BlockNumber,
    /// Transaction hash
    Hash,
    /// Sender address
    From,
    /// Recipient address, empty for contract creations
    To,
    /// Transferred value in ETH
    ValueEth,
    /// Transferred value in USD
    ValueUsd,
    /// Gas price in gwei
    GasPriceGwei,
    /// Price of one unit of gas in USD
    GasPriceUsd,
    /// Fee paid in ETH
    FeeEth,
    /// Fee paid in USD
    FeeUsd,
}

impl Column {
    /// Every column, in output order
    pub const ALL: [Column; 10] = [
        Column::BlockNumber,
        Column::Hash,
        Column::From,
        Column::To,
        Column::ValueEth,
        Column::ValueUsd,
        Column::GasPriceGwei,
        Column::GasPriceUsd,
        Column::FeeEth,
        Column::FeeUsd,
    ];

    /// Header cell
    pub const fn header(self) -> &'static str {
        match self {
            Column::BlockNumber => "Block number",
            Column::Hash => "hash",
            Column::From => "from",
            Column::To => "to",
            Column::ValueEth => "Value (ETH)",
            Column::ValueUsd => "Value (USD)",
            Column::GasPriceGwei => "Gas price (Gwei)",
            Column::GasPriceUsd => "Gas price (USD)",
            Column::FeeEth => "Transaction fee (ETH)",
            Column::FeeUsd => "Transaction fee (USD)",
        }
    }

    /// Cell for `tx`; fee columns are empty when no fee is attached
    pub fn value(self, tx: &EnrichedTransaction) -> String {
        let fee = tx.fee.as_ref();
        match self {
            Column::BlockNumber => tx.block_number.to_string(),
            Column::Hash => tx.raw.hash.clone(),
            Column::From => tx.raw.from.clone(),
            Column::To => tx.raw.to.clone().unwrap_or_default(),
            Column::ValueEth => format_decimal(&tx.value_eth),
            Column::ValueUsd => format_decimal(&tx.value_usd),
            Column::GasPriceGwei => fee.map(|f| format_decimal(&f.gas_price_gwei)).unwrap_or_default(),
            Column::GasPriceUsd => fee.map(|f| format_decimal(&f.gas_price_usd)).unwrap_or_default(),
            Column::FeeEth => fee.map(|f| format_decimal(&f.fee_eth)).unwrap_or_default(),
            Column::FeeUsd => fee.map(|f| format_decimal(&f.fee_usd)).unwrap_or_default(),
        }
    }
}

/// Path of the result file for an output base name: `{base}.csv`
///
/// ```
/// use std::path::PathBuf;
/// use txfilter::output_path;
///
/// assert_eq!(output_path("out"), PathBuf::from("out.csv"));
/// ```
pub fn output_path(base: &str) -> PathBuf {
    PathBuf::from(format!("{base}.{CSV_EXTENSION}"))
}

/// Writes records to a CSV file
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvExporter;

impl CsvExporter {
    /// Write a header and one row per record to `destination`
    ///
    /// Rows go to a temporary file next to `destination`, which replaces it
    /// only after every row is flushed. On error nothing is left behind.
    ///
    /// Returns the number of rows written.
    pub fn export(
        &self,
        records: &[EnrichedTransaction],
        columns: &[Column],
        destination: &Path,
    ) -> Result<usize, ExportError> {
        let dir = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let temp = NamedTempFile::new_in(dir).map_err(|e| ExportError::io(destination, e))?;

        let mut writer = csv::Writer::from_writer(temp);
        writer
            .write_record(columns.iter().map(|c| c.header()))
            .map_err(|e| ExportError::csv(destination, e))?;
        for tx in records {
            writer
                .write_record(columns.iter().map(|c| c.value(tx)))
                .map_err(|e| ExportError::csv(destination, e))?;
        }

        let temp = writer
            .into_inner()
            .map_err(|e| ExportError::io(destination, e.into_error()))?;
        temp.persist(destination)
            .map_err(|e| ExportError::io(destination, e.error))?;

        info!(path = %destination.display(), rows = records.len(), "Wrote results");
        Ok(records.len())
    }
}
