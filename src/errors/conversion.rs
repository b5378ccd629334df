//! Errors raised while converting hexadecimal quantities.

/// A hexadecimal quantity could not be turned into a number.
///
/// With a well-behaved provider this never happens; seeing it means the
/// upstream data is corrupt or the backend returned an unexpected shape.
///
/// # Examples
///
/// ```rust
/// use txfilter::{hex_to_decimal, ConversionError};
///
/// let err = hex_to_decimal("0xZZ").unwrap_err();
/// assert!(matches!(err, ConversionError::MalformedNumber { .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// The input is not a valid base-16 integer.
    #[error("'{input}' is not a valid hex quantity: {reason}")]
    MalformedNumber {
        /// The offending input, as received
        input: String,
        /// Why it was rejected
        reason: String,
    },
}

impl ConversionError {
    /// Create a `MalformedNumber` error.
    pub fn malformed(input: impl Into<String>, reason: impl Into<String>) -> Self {
        ConversionError::MalformedNumber {
            input: input.into(),
            reason: reason.into(),
        }
    }
}
