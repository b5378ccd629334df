//! Well-known endpoints, environment variable names and defaults
//!
//! Centralizes the constants shared by the CLI, the provider presets and the
//! exporter.

use std::time::Duration;

/// Etherscan's multichain API base URL
pub const DEFAULT_ETHERSCAN_URL: &str = "https://api.etherscan.io/v2/api";

/// Requests per second allowed on Etherscan's free tier
pub const DEFAULT_ETHERSCAN_RATE_LIMIT: u32 = 5;

/// Request timeout used by the provider presets
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Output base name when none is given
pub const DEFAULT_OUTPUT: &str = "out";

/// Extension appended to the output base name
pub const CSV_EXTENSION: &str = "csv";

/// Environment variable names read by the binary
pub mod env {
    /// Etherscan API key
    pub const API_KEY: &str = "API_KEY";

    /// Override for the Etherscan base URL
    pub const ETHERSCAN_API_URL: &str = "ETHERSCAN_API_URL";

    /// JSON-RPC node URL for the `rpc` backend
    pub const RPC_URL: &str = "RPC_URL";
}
