//! Exchange rate between the native coin and fiat

use bigdecimal::BigDecimal;
use serde::Serialize;
use std::str::FromStr;

use crate::convert::format_decimal;
use crate::errors::ProviderError;

/// USD per ETH, held immutable for the part of a run it applies to
///
/// # Examples
///
/// ```
/// use bigdecimal::BigDecimal;
/// use txfilter::ExchangeRate;
///
/// let rate = ExchangeRate::parse("2000.0").unwrap();
/// assert_eq!(rate.to_fiat(&BigDecimal::from(2)), BigDecimal::from(4000));
/// assert!(ExchangeRate::parse("0").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExchangeRate(BigDecimal);

impl ExchangeRate {
    /// Create a rate; it must be strictly positive
    pub fn new(usd_per_eth: BigDecimal) -> Result<Self, ProviderError> {
        if usd_per_eth <= BigDecimal::from(0) {
            return Err(ProviderError::InvalidRate {
                value: usd_per_eth.to_string(),
            });
        }
        Ok(Self(usd_per_eth))
    }

    /// Parse a rate from the decimal string a price API returns
    pub fn parse(value: &str) -> Result<Self, ProviderError> {
        let decimal = BigDecimal::from_str(value.trim()).map_err(|_| ProviderError::InvalidRate {
            value: value.to_string(),
        })?;
        Self::new(decimal)
    }

    /// The rate as a decimal
    pub fn as_decimal(&self) -> &BigDecimal {
        &self.0
    }

    /// Convert an amount in ETH into USD
    pub fn to_fiat(&self, eth: &BigDecimal) -> BigDecimal {
        eth * &self.0
    }
}

impl std::fmt::Display for ExchangeRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} USD/ETH", format_decimal(&self.0))
    }
}
