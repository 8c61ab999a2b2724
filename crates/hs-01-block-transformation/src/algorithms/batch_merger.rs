//! Batch merger.
//!
//! Folds per-block results into one. Order matters: a later block's write to
//! a key replaces an earlier block's, so input must be in ascending block
//! order.

use shared_types::{Block, ExtractionResult};

use crate::algorithms::transform_block;
use crate::domain::TransformError;

/// Left fold of `results`, later entries winning.
pub fn merge_results<I>(results: I) -> ExtractionResult
where
    I: IntoIterator<Item = ExtractionResult>,
{
    results
        .into_iter()
        .fold(ExtractionResult::new(), |mut acc, next| {
            acc.absorb(next);
            acc
        })
}

/// Transform and merge `blocks`, which must be strictly ascending by number.
pub fn transform_blocks(blocks: &[Block]) -> Result<ExtractionResult, TransformError> {
    for pair in blocks.windows(2) {
        if pair[1].number <= pair[0].number {
            return Err(TransformError::OutOfOrder {
                previous: pair[0].number,
                next: pair[1].number,
            });
        }
    }

    let per_block = blocks
        .iter()
        .map(transform_block)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(merge_results(per_block))
}
