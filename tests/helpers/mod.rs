// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Test helpers for txfilter integration tests
//!
//! Provides mock implementations of the provider traits so the pipeline can
//! be exercised without network access.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use txfilter::{
    ChainDataProvider, ExchangeRate, ExchangeRateSource, ProviderError, RawBlock, RawReceipt,
    RawTransaction,
};

/// Build a raw transaction with fixed addresses
pub fn tx(hash: &str, value: &str, gas_price: &str, block: u64) -> RawTransaction {
    RawTransaction {
        hash: hash.to_string(),
        from: "0x1111111111111111111111111111111111111111".to_string(),
        to: Some("0x2222222222222222222222222222222222222222".to_string()),
        value: value.to_string(),
        gas_price: gas_price.to_string(),
        block_number: format!("{block:#x}"),
    }
}

/// Mock chain with canned blocks and receipts
///
/// Counts every call so tests can assert which lookups happened.
///
/// # Example
///
/// ```rust,ignore
/// let chain = MockChain::new(100)
///     .with_block(100, vec![tx("0xaa", "0xde0b6b3a7640000", "0x1", 100)])
///     .with_receipt("0xaa", "0x5208");
/// ```
pub struct MockChain {
    height: u64,
    blocks: HashMap<u64, RawBlock>,
    receipts: HashMap<String, RawReceipt>,
    failing_receipt: Option<String>,
    failing_height: bool,
    failing_block: Option<u64>,
    block_delays: HashMap<u64, Duration>,
    receipt_calls: Mutex<Vec<String>>,
    block_calls: AtomicUsize,
}

impl MockChain {
    /// A chain at `height` with no blocks
    pub fn new(height: u64) -> Self {
        Self {
            height,
            blocks: HashMap::new(),
            receipts: HashMap::new(),
            failing_receipt: None,
            failing_height: false,
            failing_block: None,
            block_delays: HashMap::new(),
            receipt_calls: Mutex::new(Vec::new()),
            block_calls: AtomicUsize::new(0),
        }
    }

    /// Serve a block with these transactions at `height`
    pub fn with_block(mut self, height: u64, transactions: Vec<RawTransaction>) -> Self {
        self.blocks.insert(
            height,
            RawBlock {
                number: Some(format!("{height:#x}")),
                transactions,
            },
        );
        self
    }

    /// Serve a receipt with `gas_used` for `hash`
    pub fn with_receipt(mut self, hash: &str, gas_used: &str) -> Self {
        self.receipts.insert(
            hash.to_string(),
            RawReceipt {
                gas_used: gas_used.to_string(),
            },
        );
        self
    }

    /// Fail the receipt lookup for `hash` with an API error
    pub fn with_failing_receipt(mut self, hash: &str) -> Self {
        self.failing_receipt = Some(hash.to_string());
        self
    }

    /// Fail the chain head lookup with a transport error
    pub fn with_failing_height(mut self) -> Self {
        self.failing_height = true;
        self
    }

    /// Fail the fetch of block `height` with an API error
    pub fn with_failing_block(mut self, height: u64) -> Self {
        self.failing_block = Some(height);
        self
    }

    /// Delay the response for block `height`
    pub fn with_block_delay(mut self, height: u64, delay: Duration) -> Self {
        self.block_delays.insert(height, delay);
        self
    }

    /// Hashes whose receipts were requested, in request order
    pub fn receipt_calls(&self) -> Vec<String> {
        self.receipt_calls.lock().unwrap().clone()
    }

    /// Number of block fetches
    pub fn block_calls(&self) -> usize {
        self.block_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChainDataProvider for MockChain {
    async fn current_height(&self) -> Result<u64, ProviderError> {
        if self.failing_height {
            return Err(ProviderError::transport(
                "eth_blockNumber",
                std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused"),
            ));
        }
        Ok(self.height)
    }

    async fn block(&self, height: u64) -> Result<RawBlock, ProviderError> {
        self.block_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.block_delays.get(&height) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing_block == Some(height) {
            return Err(ProviderError::Api {
                operation: "eth_getBlockByNumber".to_string(),
                message: "Max rate limit reached".to_string(),
            });
        }
        self.blocks
            .get(&height)
            .cloned()
            .ok_or(ProviderError::BlockNotFound {
                block_number: height,
            })
    }

    async fn receipt(&self, tx_hash: &str) -> Result<RawReceipt, ProviderError> {
        self.receipt_calls.lock().unwrap().push(tx_hash.to_string());
        if self.failing_receipt.as_deref() == Some(tx_hash) {
            return Err(ProviderError::Api {
                operation: "eth_getTransactionReceipt".to_string(),
                message: "Max rate limit reached".to_string(),
            });
        }
        self.receipts
            .get(tx_hash)
            .cloned()
            .ok_or_else(|| ProviderError::ReceiptNotFound {
                tx_hash: tx_hash.to_string(),
            })
    }
}

/// Mock exchange rate source returning a sequence of rates
///
/// Each call returns the next rate; the last one repeats.
pub struct MockRates {
    rates: Vec<ExchangeRate>,
    calls: AtomicUsize,
}

impl MockRates {
    /// Always return `rate`
    pub fn fixed(rate: &str) -> Self {
        Self::sequence(&[rate])
    }

    /// Return `rates` in order, repeating the last
    pub fn sequence(rates: &[&str]) -> Self {
        Self {
            rates: rates
                .iter()
                .map(|r| ExchangeRate::parse(r).unwrap())
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of rate fetches
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExchangeRateSource for MockRates {
    async fn exchange_rate(&self) -> Result<ExchangeRate, ProviderError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let index = call.min(self.rates.len() - 1);
        Ok(self.rates[index].clone())
    }
}

/// Exchange rate source whose every call fails with an API error
#[derive(Default)]
pub struct FailingRates {
    calls: AtomicUsize,
}

impl FailingRates {
    /// Number of rate fetches
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExchangeRateSource for FailingRates {
    async fn exchange_rate(&self) -> Result<ExchangeRate, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ProviderError::Api {
            operation: "ethprice".to_string(),
            message: "NOTOK".to_string(),
        })
    }
}

/// Hash of the 2 ETH transaction in block 99
pub const TX_A: &str = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
/// Hash of the 0.5 ETH transaction in block 99
pub const TX_B: &str = "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";
/// Hash of the 1 ETH transaction in block 100
pub const TX_C: &str = "0xcccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccc";
/// Hash of the zero-value transaction in block 100
pub const TX_D: &str = "0xdddddddddddddddddddddddddddddddddddddddddddddddddddddddddddddddd";

/// Chain at height 100 with two populated blocks
///
/// | block | tx | value   | gas price | gas used |
/// |-------|----|---------|-----------|----------|
/// | 99    | A  | 2 ETH   | 20 gwei   | 21000    |
/// | 99    | B  | 0.5 ETH | 20 gwei   | 21000    |
/// | 100   | C  | 1 ETH   | 30 gwei   | 50000    |
/// | 100   | D  | 0       | 1 gwei    | 21000    |
pub fn fixture_chain() -> MockChain {
    MockChain::new(100)
        .with_block(
            99,
            vec![
                tx(TX_A, "0x1bc16d674ec80000", "0x4a817c800", 99),
                tx(TX_B, "0x6f05b59d3b20000", "0x4a817c800", 99),
            ],
        )
        .with_block(
            100,
            vec![
                tx(TX_C, "0xde0b6b3a7640000", "0x6fc23ac00", 100),
                tx(TX_D, "0x0", "0x3b9aca00", 100),
            ],
        )
        .with_receipt(TX_A, "0x5208")
        .with_receipt(TX_B, "0x5208")
        .with_receipt(TX_C, "0xc350")
        .with_receipt(TX_D, "0x5208")
}
