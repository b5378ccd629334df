// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Strong type for native currency amounts
//!
//! Values and gas prices arrive from providers as hex strings in wei. Wrapping
//! them in [`WeiAmount`] keeps raw wei from being mixed with the ether/gwei
//! decimals the enricher derives from them.

use alloy_primitives::U256;
use bigdecimal::BigDecimal;

use crate::convert::{hex_to_u256, to_whole_unit, u256_to_decimal, Unit};
use crate::errors::ConversionError;

/// Represents an amount of native currency (ETH) in wei
///
/// # Examples
///
/// ```
/// use bigdecimal::BigDecimal;
/// use std::str::FromStr;
/// use txfilter::WeiAmount;
///
/// let value = WeiAmount::from_hex("0x6f05b59d3b20000").unwrap(); // 0.5 ETH
/// assert_eq!(value.to_ether().unwrap(), BigDecimal::from_str("0.5").unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeiAmount(U256);

impl WeiAmount {
    /// Parse a hex quantity in wei, as found in transaction fields
    pub fn from_hex(hex: &str) -> Result<Self, ConversionError> {
        hex_to_u256(hex).map(Self)
    }

    /// Exact decimal value of this amount expressed in `unit`
    pub fn to_unit(&self, unit: Unit) -> Result<BigDecimal, ConversionError> {
        let wei = u256_to_decimal(self.0)?;
        Ok(to_whole_unit(&wei, unit.exponent()))
    }

    /// Convert to gwei (1 gwei = 10^9 wei), without rounding
    ///
    /// ```
    /// use bigdecimal::BigDecimal;
    /// use txfilter::WeiAmount;
    ///
    /// let amount = WeiAmount::from_hex("0x12a05f200").unwrap();
    /// assert_eq!(amount.to_gwei().unwrap(), BigDecimal::from(5));
    /// ```
    pub fn to_gwei(&self) -> Result<BigDecimal, ConversionError> {
        self.to_unit(Unit::Gwei)
    }

    /// Convert to ether (1 ETH = 10^18 wei), without rounding
    pub fn to_ether(&self) -> Result<BigDecimal, ConversionError> {
        self.to_unit(Unit::Ether)
    }
}
