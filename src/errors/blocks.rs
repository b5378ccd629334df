//! Error types for block range resolution.

use alloy_primitives::BlockNumber;

/// Errors that can occur while resolving the block range to scan.
///
/// These are user input errors: the run is aborted before any block is
/// fetched.
///
/// # Examples
///
/// ```rust
/// use txfilter::{resolve_range, BlockRangeError, RequestedBlock};
///
/// let err = resolve_range(RequestedBlock::Number(101), 1, 100).unwrap_err();
/// assert!(matches!(err, BlockRangeError::BeyondChainHead { .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlockRangeError {
    /// The requested last block has not been produced yet.
    #[error("block {requested} does not exist yet (current height is {current})")]
    BeyondChainHead {
        /// Requested last block
        requested: BlockNumber,
        /// Chain height read at the start of the run
        current: BlockNumber,
    },

    /// Zero blocks were requested.
    #[error("number of blocks must be at least 1")]
    EmptyRange,

    /// The range would start before the genesis block.
    #[error("cannot scan {num_blocks} blocks ending at block {end}: range would start before genesis")]
    BeforeGenesis {
        /// Last block of the range
        end: BlockNumber,
        /// Requested number of blocks
        num_blocks: u64,
    },
}
