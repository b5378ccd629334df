// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Remote data sources for a scan
//!
//! The pipeline talks to the outside world through two object-safe traits:
//!
//! - [`ChainDataProvider`] - current height, blocks with full transactions,
//!   and receipts
//! - [`ExchangeRateSource`] - the USD per ETH rate
//!
//! Two backends implement them:
//!
//! - [`EtherscanClient`] - Etherscan's HTTP API (`proxy` and `stats` modules);
//!   implements both traits
//! - [`RpcChainProvider`] - any Ethereum JSON-RPC node; chain data only
//!
//! [`connect`] builds the pair a run needs from a [`Backends`] description, so
//! the binary can pick backends at runtime.
//!
//! # Implementing a provider
//!
//! ```rust,ignore
//! use async_trait::async_trait;
//! use txfilter::provider::ChainDataProvider;
//!
//! struct Archive { /* ... */ }
//!
//! #[async_trait]
//! impl ChainDataProvider for Archive {
//!     async fn current_height(&self) -> Result<u64, ProviderError> { /* ... */ }
//!     async fn block(&self, height: u64) -> Result<RawBlock, ProviderError> { /* ... */ }
//!     async fn receipt(&self, tx_hash: &str) -> Result<RawReceipt, ProviderError> { /* ... */ }
//! }
//! ```

mod config;
mod etherscan;
mod factory;
mod rpc;

pub use config::ProviderConfig;
pub use etherscan::{decode_envelope, EtherscanClient, EthPrice};
pub use factory::{connect, Backends, ChainBackend, Connected, RateBackend};
pub use rpc::RpcChainProvider;

use alloy_primitives::BlockNumber;
use async_trait::async_trait;
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::types::rate::ExchangeRate;
use crate::types::transaction::{RawBlock, RawReceipt};

/// Source of chain state: height, blocks and receipts
///
/// Implementations must return a block's transactions in on-chain order.
/// A missing block or receipt is an error, never an empty value.
#[async_trait]
pub trait ChainDataProvider: Send + Sync {
    /// Height of the most recent block
    async fn current_height(&self) -> Result<BlockNumber, ProviderError>;

    /// The block at `height`, with full transaction objects
    async fn block(&self, height: BlockNumber) -> Result<RawBlock, ProviderError>;

    /// The receipt of the transaction with hash `tx_hash`
    async fn receipt(&self, tx_hash: &str) -> Result<RawReceipt, ProviderError>;
}

/// Source of the USD per ETH exchange rate
#[async_trait]
pub trait ExchangeRateSource: Send + Sync {
    /// The current rate
    async fn exchange_rate(&self) -> Result<ExchangeRate, ProviderError>;
}

#[async_trait]
impl<T: ChainDataProvider + ?Sized> ChainDataProvider for Box<T> {
    async fn current_height(&self) -> Result<BlockNumber, ProviderError> {
        (**self).current_height().await
    }

    async fn block(&self, height: BlockNumber) -> Result<RawBlock, ProviderError> {
        (**self).block(height).await
    }

    async fn receipt(&self, tx_hash: &str) -> Result<RawReceipt, ProviderError> {
        (**self).receipt(tx_hash).await
    }
}

#[async_trait]
impl<T: ChainDataProvider + ?Sized> ChainDataProvider for Arc<T> {
    async fn current_height(&self) -> Result<BlockNumber, ProviderError> {
        (**self).current_height().await
    }

    async fn block(&self, height: BlockNumber) -> Result<RawBlock, ProviderError> {
        (**self).block(height).await
    }

    async fn receipt(&self, tx_hash: &str) -> Result<RawReceipt, ProviderError> {
        (**self).receipt(tx_hash).await
    }
}

#[async_trait]
impl<T: ExchangeRateSource + ?Sized> ExchangeRateSource for Box<T> {
    async fn exchange_rate(&self) -> Result<ExchangeRate, ProviderError> {
        (**self).exchange_rate().await
    }
}

#[async_trait]
impl<T: ExchangeRateSource + ?Sized> ExchangeRateSource for Arc<T> {
    async fn exchange_rate(&self) -> Result<ExchangeRate, ProviderError> {
        (**self).exchange_rate().await
    }
}
