// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Transaction records as they come from a provider and as they leave the enricher
//!
//! Raw types keep numeric fields as the hex strings the provider sent; all
//! interpretation happens in the enricher so a malformed field is reported
//! against the transaction that carried it.

use alloy_primitives::BlockNumber;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// A transaction object from `eth_getBlockByNumber` with full transactions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransaction {
    /// Transaction hash
    pub hash: String,
    /// Sender address
    pub from: String,
    /// Recipient address; `None` for contract creations
    #[serde(default)]
    pub to: Option<String>,
    /// Transferred value in wei (hex)
    pub value: String,
    /// Gas price in wei (hex)
    pub gas_price: String,
    /// Height of the containing block (hex)
    pub block_number: String,
}

/// A block with its transactions in on-chain order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBlock {
    /// Block height (hex), when the provider includes it
    #[serde(default)]
    pub number: Option<String>,
    /// Transactions in the order they were included
    #[serde(default)]
    pub transactions: Vec<RawTransaction>,
}

/// The part of a transaction receipt the enricher needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReceipt {
    /// Gas actually consumed (hex)
    pub gas_used: String,
}

/// Gas pricing and fee of a transaction that passed the value filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeBreakdown {
    /// Gas price in gwei
    pub gas_price_gwei: BigDecimal,
    /// Price of one unit of gas in USD
    pub gas_price_usd: BigDecimal,
    /// Gas consumed, from the receipt
    pub gas_used: BigDecimal,
    /// Fee paid in ETH
    pub fee_eth: BigDecimal,
    /// Fee paid in USD
    pub fee_usd: BigDecimal,
}

/// A raw transaction plus the values derived from it
///
/// `fee` is `Some` exactly when the transaction passed the value filter: fee
/// data costs a receipt lookup, so it is never computed for rejected ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedTransaction {
    /// The transaction as received
    pub raw: RawTransaction,
    /// Decimal height of the containing block, set with the fee
    pub block_number: BlockNumber,
    /// Transferred value in ETH
    pub value_eth: BigDecimal,
    /// Transferred value in USD
    pub value_usd: BigDecimal,
    /// Fee data, present only for accepted transactions
    pub fee: Option<FeeBreakdown>,
}

impl EnrichedTransaction {
    /// Transaction hash
    pub fn hash(&self) -> &str {
        &self.raw.hash
    }
}
