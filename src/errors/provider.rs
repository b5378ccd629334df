//! Errors from the chain data and exchange-rate providers.
//!
//! Every variant is fatal to a scan; they are split only so the diagnostic
//! says which call failed and why.

use alloy_primitives::BlockNumber;

use super::ConversionError;

/// Errors that can occur while talking to a remote data provider.
///
/// # Examples
///
/// ```rust
/// use txfilter::ProviderError;
///
/// let error = ProviderError::ReceiptNotFound {
///     tx_hash: "0x123...".to_string(),
/// };
/// println!("Error: {}", error);
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The HTTP request could not be sent or its body could not be read.
    #[error("HTTP request for {operation} failed")]
    Http {
        /// Operation being performed (e.g. "eth_getBlockByNumber")
        operation: String,
        /// The underlying client error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The server answered with a non-success HTTP status.
    #[error("{operation} returned HTTP status {status}")]
    HttpStatus {
        /// Operation being performed
        operation: String,
        /// HTTP status code
        status: u16,
    },

    /// The API reported a failure status (e.g. Etherscan `"status": "0"`).
    #[error("{operation} failed: {message}")]
    Api {
        /// Operation being performed
        operation: String,
        /// Message returned by the API
        message: String,
    },

    /// The node answered with a JSON-RPC error object.
    #[error("{operation} returned JSON-RPC error {code}: {message}")]
    Rpc {
        /// Operation being performed
        operation: String,
        /// JSON-RPC error code
        code: i64,
        /// JSON-RPC error message
        message: String,
    },

    /// The RPC transport failed during a call.
    #[error("RPC transport failed during {operation}")]
    Transport {
        /// Operation being performed
        operation: String,
        /// The underlying transport error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The response body did not have the expected shape.
    #[error("could not decode {operation} response: {details}")]
    Decode {
        /// Operation being performed
        operation: String,
        /// What was wrong with the body
        details: String,
    },

    /// A numeric field in the response was not a valid hex quantity.
    #[error("{operation} returned a malformed number")]
    MalformedField {
        /// Operation being performed
        operation: String,
        /// The conversion failure
        #[source]
        source: ConversionError,
    },

    /// The provider has no block at this height.
    #[error("Block not found: {block_number}")]
    BlockNotFound {
        /// Height that was requested
        block_number: BlockNumber,
    },

    /// The provider has no receipt for this transaction.
    #[error("Receipt not found for transaction: {tx_hash}")]
    ReceiptNotFound {
        /// The transaction hash whose receipt wasn't found
        tx_hash: String,
    },

    /// The exchange rate is missing, unparsable or not positive.
    #[error("invalid exchange rate '{value}'")]
    InvalidRate {
        /// The raw value returned by the source
        value: String,
    },

    /// The backend requires an API key and none was configured.
    #[error("{backend} requires an API key")]
    MissingApiKey {
        /// Name of the backend
        backend: &'static str,
    },

    /// The configured endpoint URL is malformed.
    #[error("invalid provider URL {url}: {details}")]
    InvalidUrl {
        /// The rejected URL
        url: String,
        /// Parser message
        details: String,
    },
}

impl ProviderError {
    /// Helper to create an `Http` error from any error type.
    pub fn http(
        operation: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ProviderError::Http {
            operation: operation.into(),
            source: Box::new(source),
        }
    }

    /// Helper to create a `Transport` error from any error type.
    pub fn transport(
        operation: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ProviderError::Transport {
            operation: operation.into(),
            source: Box::new(source),
        }
    }

    /// Helper to create a `Decode` error.
    pub fn decode(operation: impl Into<String>, details: impl Into<String>) -> Self {
        ProviderError::Decode {
            operation: operation.into(),
            details: details.into(),
        }
    }

    /// Helper to wrap a hex conversion failure for a given call.
    pub fn malformed_field(operation: impl Into<String>, source: ConversionError) -> Self {
        ProviderError::MalformedField {
            operation: operation.into(),
            source,
        }
    }
}
