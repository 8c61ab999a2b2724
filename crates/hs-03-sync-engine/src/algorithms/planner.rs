//! # Step Planner
//!
//! Decides between idling, a catch-up batch and a tailing range.

use crate::domain::{BlockRange, Step};

/// Plan the next iteration.
///
/// - `next_block > height`: idle.
/// - lag above `max_allowed_lag`: catch up with at most `batch_size` blocks.
/// - otherwise: tail everything up to `height`.
pub fn plan_step(next_block: u64, height: u64, batch_size: u64, max_allowed_lag: u64) -> Step {
    if next_block > height {
        return Step::Idle;
    }

    let lag = height - next_block + 1;
    if lag > max_allowed_lag {
        let end = height.min(next_block.saturating_add(batch_size.max(1) - 1));
        Step::CatchUp(BlockRange::new(next_block, end))
    } else {
        Step::Tail(BlockRange::new(next_block, height))
    }
}
