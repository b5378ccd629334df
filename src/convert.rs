// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Hexadecimal quantity parsing and unit conversion
//!
//! Providers return every numeric field as a base-16 string in the smallest
//! unit (wei). This module turns those strings into exact [`BigDecimal`]
//! values and scales them into display units without ever rounding.

use alloy_primitives::U256;
use bigdecimal::BigDecimal;
use std::str::FromStr;

use crate::errors::ConversionError;

/// Power of ten between wei and ether
pub const ETHER_EXPONENT: u32 = 18;

/// Power of ten between wei and gwei
pub const GWEI_EXPONENT: u32 = 9;

/// Display units for native currency amounts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    /// Smallest on-chain unit
    Wei,
    /// 10^9 wei, used for gas prices
    Gwei,
    /// 10^18 wei, the whole coin
    Ether,
}

impl Unit {
    /// Power of ten between wei and this unit
    pub const fn exponent(self) -> u32 {
        match self {
            Unit::Wei => 0,
            Unit::Gwei => GWEI_EXPONENT,
            Unit::Ether => ETHER_EXPONENT,
        }
    }
}

/// Parse a hex quantity (`0x`-prefixed or bare) into a [`U256`].
///
/// # Errors
///
/// Returns [`ConversionError::MalformedNumber`] for empty input, a bare
/// prefix, non-hex characters, or values wider than 256 bits.
///
/// # Examples
///
/// ```
/// use alloy_primitives::U256;
/// use txfilter::hex_to_u256;
///
/// assert_eq!(hex_to_u256("0x5208").unwrap(), U256::from(21_000u64));
/// assert_eq!(hex_to_u256("ff").unwrap(), U256::from(255u64));
/// assert!(hex_to_u256("0x").is_err());
/// ```
pub fn hex_to_u256(input: &str) -> Result<U256, ConversionError> {
    let digits = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input);

    if digits.is_empty() {
        return Err(ConversionError::malformed(input, "no hex digits"));
    }
    if let Some(bad) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(ConversionError::malformed(
            input,
            format!("unexpected character '{bad}'"),
        ));
    }
    // Leading zeros are legal, so only the significant digits count toward the width
    if digits.trim_start_matches('0').len() > 64 {
        return Err(ConversionError::malformed(input, "exceeds 256 bits"));
    }

    U256::from_str_radix(digits, 16).map_err(|e| ConversionError::malformed(input, e.to_string()))
}

/// Parse a hex quantity that must fit in 64 bits (block heights).
///
/// ```
/// use txfilter::hex_to_u64;
///
/// assert_eq!(hex_to_u64("0x64").unwrap(), 100);
/// assert!(hex_to_u64("0x10000000000000000").is_err());
/// ```
pub fn hex_to_u64(input: &str) -> Result<u64, ConversionError> {
    let value = hex_to_u256(input)?;
    u64::try_from(value).map_err(|_| ConversionError::malformed(input, "exceeds 64 bits"))
}

/// Parse a hex quantity into an exact decimal in the same unit.
///
/// ```
/// use bigdecimal::BigDecimal;
/// use txfilter::hex_to_decimal;
///
/// assert_eq!(hex_to_decimal("0xde0b6b3a7640000").unwrap(), BigDecimal::from(1_000_000_000_000_000_000u64));
/// ```
pub fn hex_to_decimal(input: &str) -> Result<BigDecimal, ConversionError> {
    let value = hex_to_u256(input)?;
    u256_to_decimal(value).map_err(|_| ConversionError::malformed(input, "not representable"))
}

/// Convert a [`U256`] into a [`BigDecimal`] holding the same integer.
pub fn u256_to_decimal(value: U256) -> Result<BigDecimal, ConversionError> {
    let text = value.to_string();
    BigDecimal::from_str(&text).map_err(|e| ConversionError::malformed(text, e.to_string()))
}

/// Divide an amount by `10^exponent`, exactly.
///
/// Multiplying by `10^-exponent` only moves the decimal point, so no digits
/// are lost the way a general-purpose division could lose them.
///
/// ```
/// use bigdecimal::BigDecimal;
/// use std::str::FromStr;
/// use txfilter::{to_whole_unit, ETHER_EXPONENT};
///
/// let wei = BigDecimal::from(1_500_000_000_000_000_000u64);
/// assert_eq!(to_whole_unit(&wei, ETHER_EXPONENT), BigDecimal::from_str("1.5").unwrap());
/// ```
pub fn to_whole_unit(smallest_unit: &BigDecimal, exponent: u32) -> BigDecimal {
    smallest_unit * &BigDecimal::new(1.into(), i64::from(exponent))
}

/// Render a decimal in plain notation with trailing zeros removed.
///
/// `BigDecimal`'s `Display` switches to exponent notation for very small or
/// very large values, which spreadsheet users do not expect in a CSV cell.
///
/// ```
/// use bigdecimal::BigDecimal;
/// use std::str::FromStr;
/// use txfilter::format_decimal;
///
/// assert_eq!(format_decimal(&BigDecimal::from_str("4000.0").unwrap()), "4000");
/// assert_eq!(format_decimal(&BigDecimal::from_str("0.00004").unwrap()), "0.00004");
/// ```
pub fn format_decimal(value: &BigDecimal) -> String {
    let (digits, scale) = value.normalized().as_bigint_and_exponent();
    let text = digits.to_string();
    let (sign, magnitude) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };

    if magnitude == "0" {
        return "0".to_string();
    }

    let body = if scale <= 0 {
        format!("{magnitude}{}", "0".repeat(scale.unsigned_abs() as usize))
    } else {
        let scale = scale as usize;
        if magnitude.len() > scale {
            let (whole, fraction) = magnitude.split_at(magnitude.len() - scale);
            format!("{whole}.{fraction}")
        } else {
            format!("0.{}{magnitude}", "0".repeat(scale - magnitude.len()))
        }
    };

    format!("{sign}{body}")
}
