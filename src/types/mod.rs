// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Strong types for type safety across txfilter.
//!
//! - Wei amounts parsed from hex quantities
//! - The USD/ETH exchange rate
//! - Raw and enriched transaction records

pub mod rate;
pub mod transaction;
pub mod wei;

// Note: Public types are re-exported from lib.rs, not here
