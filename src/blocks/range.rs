//! Closed block ranges and their resolution against the chain head
//!
//! A run names its last block (or "latest") and a block count. The range is
//! resolved once, against the height read at the start of the run, and is
//! never adjusted afterwards.
//!
//! # Examples
//!
//! ```rust
//! use txfilter::{resolve_range, RequestedBlock};
//!
//! let range = resolve_range(RequestedBlock::Latest, 2, 100).unwrap();
//! assert_eq!((range.start(), range.end()), (99, 100));
//! assert_eq!(range.heights().collect::<Vec<_>>(), vec![99, 100]);
//! ```

use alloy_primitives::BlockNumber;
use std::fmt;

use crate::errors::BlockRangeError;

/// The last block a run should scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RequestedBlock {
    /// The chain head at the start of the run
    #[default]
    Latest,
    /// A specific height
    Number(BlockNumber),
}

impl From<Option<BlockNumber>> for RequestedBlock {
    fn from(block: Option<BlockNumber>) -> Self {
        block.map_or(RequestedBlock::Latest, RequestedBlock::Number)
    }
}

impl fmt::Display for RequestedBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestedBlock::Latest => f.write_str("latest"),
            RequestedBlock::Number(n) => write!(f, "{n}"),
        }
    }
}

/// A closed, non-empty interval of block heights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockRange {
    start: BlockNumber,
    end: BlockNumber,
}

impl BlockRange {
    /// Create the range `[start, end]`
    ///
    /// # Errors
    ///
    /// Returns [`BlockRangeError::EmptyRange`] if `start > end`.
    pub fn new(start: BlockNumber, end: BlockNumber) -> Result<Self, BlockRangeError> {
        if start > end {
            return Err(BlockRangeError::EmptyRange);
        }
        Ok(Self { start, end })
    }

    /// First block (inclusive)
    pub const fn start(&self) -> BlockNumber {
        self.start
    }

    /// Last block (inclusive)
    pub const fn end(&self) -> BlockNumber {
        self.end
    }

    /// Number of blocks in the range
    pub const fn len(&self) -> u64 {
        (self.end - self.start).saturating_add(1)
    }

    /// Always false: a range holds at least one block
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Heights in ascending order
    pub fn heights(&self) -> std::ops::RangeInclusive<BlockNumber> {
        self.start..=self.end
    }

    /// Split into consecutive sub-ranges of at most `size` blocks
    ///
    /// A `size` of zero is treated as one.
    pub fn chunks(&self, size: u64) -> impl Iterator<Item = BlockRange> {
        let size = size.max(1);
        let end = self.end;
        let mut next = Some(self.start);
        std::iter::from_fn(move || {
            let start = next?;
            let chunk_end = start.saturating_add(size - 1).min(end);
            next = (chunk_end < end).then(|| chunk_end + 1);
            Some(BlockRange {
                start,
                end: chunk_end,
            })
        })
    }
}

impl fmt::Display for BlockRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// Resolve the range ending at `requested` and spanning `num_blocks` blocks
///
/// # Errors
///
/// - [`BlockRangeError::BeyondChainHead`] if a specific block above
///   `current_height` is requested
/// - [`BlockRangeError::EmptyRange`] if `num_blocks` is zero
/// - [`BlockRangeError::BeforeGenesis`] if the range would start below block 0
pub fn resolve_range(
    requested: RequestedBlock,
    num_blocks: u64,
    current_height: BlockNumber,
) -> Result<BlockRange, BlockRangeError> {
    let end = match requested {
        RequestedBlock::Latest => current_height,
        RequestedBlock::Number(n) if n > current_height => {
            return Err(BlockRangeError::BeyondChainHead {
                requested: n,
                current: current_height,
            });
        }
        RequestedBlock::Number(n) => n,
    };

    if num_blocks == 0 {
        return Err(BlockRangeError::EmptyRange);
    }

    let span = num_blocks - 1;
    if span > end {
        return Err(BlockRangeError::BeforeGenesis { end, num_blocks });
    }

    Ok(BlockRange {
        start: end - span,
        end,
    })
}
