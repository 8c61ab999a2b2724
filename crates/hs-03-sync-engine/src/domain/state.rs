//! # Sync State
//!
//! The cursor and the last observed view of the channel, owned by the sync
//! service and threaded through every iteration.

use std::fmt;

use shared_types::PeerInfo;

/// Phase of the sync loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncPhase {
    /// Checkpoint not loaded yet.
    #[default]
    Init,
    /// Far behind: applying fixed-size batches back to back.
    CatchUp,
    /// Near the head: applying whatever is new, then sleeping.
    Tailing,
}

impl SyncPhase {
    /// Metric label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::CatchUp => "catchup",
            Self::Tailing => "tailing",
        }
    }
}

/// Inclusive range of block numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRange {
    /// First block.
    pub start: u64,
    /// Last block.
    pub end: u64,
}

impl BlockRange {
    /// Create a range. `start` must not exceed `end`.
    pub fn new(start: u64, end: u64) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// Number of blocks in the range.
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// A range always holds at least one block.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Block numbers in ascending order.
    pub fn numbers(&self) -> std::ops::RangeInclusive<u64> {
        self.start..=self.end
    }
}

impl fmt::Display for BlockRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// What one iteration of the loop should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Nothing new on the ledger.
    Idle,
    /// Apply the range and continue immediately.
    CatchUp(BlockRange),
    /// Apply the range, then sleep.
    Tail(BlockRange),
}

/// Mutable state of the sync loop.
#[derive(Debug, Clone, Default)]
pub struct SyncState {
    /// Next block to fetch.
    pub next_block: u64,
    /// Highest committed block number last observed.
    pub current_height: u64,
    /// Peers used for fetches.
    pub target_peers: Vec<PeerInfo>,
    /// Current phase.
    pub phase: SyncPhase,
}

impl SyncState {
    /// State positioned at `next_block`.
    pub fn starting_at(next_block: u64) -> Self {
        Self {
            next_block,
            ..Self::default()
        }
    }

    /// Highest block fully applied, if any.
    pub fn last_applied(&self) -> Option<u64> {
        self.next_block.checked_sub(1)
    }

    /// Blocks between the cursor and the head, counting the head.
    pub fn lag(&self) -> u64 {
        (self.current_height + 1).saturating_sub(self.next_block)
    }
}
