// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Block range resolution and traversal.
//!
//! This module provides functionality for:
//! - Resolving the user's last block and block count into a closed range
//! - Walking a range in ascending order, enriching every block's transactions
//! - Refreshing the exchange rate per group of blocks

pub mod range;
pub mod walker;

// Re-export public API
pub use range::{resolve_range, BlockRange, RequestedBlock};
pub use walker::{BlockWalker, RateRefresh, RatedGroup, WalkOutput};
