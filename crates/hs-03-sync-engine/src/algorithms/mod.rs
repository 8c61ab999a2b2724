//! Pure decisions of the sync loop.

pub mod peers;
pub mod planner;

pub use peers::{chain_height, select_fresh_peers};
pub use planner::plan_step;
