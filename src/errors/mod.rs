//! Error types for the txfilter library.
//!
//! Errors follow a hybrid approach:
//!
//! - **Module-specific errors** for fine-grained handling ([`ConversionError`],
//!   [`BlockRangeError`], [`ProviderError`], [`ExportError`], [`ConfigError`])
//! - **Unified error type** ([`ScanError`]) for the pipeline, where every
//!   failure is fatal to the run
//!
//! # Examples
//!
//! ```rust,ignore
//! use txfilter::{ScanError, BlockRangeError};
//!
//! match pipeline.run().await {
//!     Ok(report) => println!("wrote {}", report.output_path.display()),
//!     Err(ScanError::Range(BlockRangeError::BeyondChainHead { requested, current })) => {
//!         eprintln!("block {requested} does not exist yet (head is {current})");
//!     }
//!     Err(e) => eprintln!("scan failed: {e}"),
//! }
//! ```

mod blocks;
mod config;
mod conversion;
mod export;
mod provider;

pub use blocks::BlockRangeError;
pub use config::ConfigError;
pub use conversion::ConversionError;
pub use export::ExportError;
pub use provider::ProviderError;

/// Unified error type for a scan run.
///
/// All module-specific error types convert into `ScanError` via `From`, so
/// `?` propagates them naturally up to the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// A hexadecimal field from the provider could not be parsed.
    #[error("Malformed number: {0}")]
    Conversion(#[from] ConversionError),

    /// The requested block range is not valid for the current chain.
    #[error("Invalid block range: {0}")]
    Range(#[from] BlockRangeError),

    /// A remote call reported a failure.
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The result file could not be written.
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Configuration was rejected before the scan started.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
