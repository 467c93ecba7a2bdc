//! # repeat-fold - Repeat and Volta Inference
//!
//! Folds a sequence of measures into compact notation using two constructs:
//! 1. **Simple repeats**: a block played verbatim `times >= 2` in a row
//! 2. **Voltas**: a shared prefix played twice, with a different ending on
//!    each pass
//!
//! The engine only sees measure fingerprints and boundary markers through a
//! [`SequenceAdapter`]. Every plan it returns replays the original sequence
//! exactly; when a proposed plan does not, the identity fold is returned
//! instead.
//!
//! ## Example
//!
//! ```
//! use repeat_fold::{render_bracketed, unroll, RepeatFolder};
//!
//! let measures = ["A", "B", "X", "A", "B", "Y", "D"];
//! let result = RepeatFolder::new().fold_slice(&measures).unwrap();
//!
//! assert_eq!(result.folded_indices, vec![0, 1, 2, 5, 6]);
//! assert_eq!(render_bracketed(&measures, &result), "|: A B 1.[X] 2.[Y] :| D");
//!
//! // Replays back to every original position
//! let replay = unroll(result.plan.as_ref(), result.folded_indices.len());
//! let original: Vec<_> = replay.iter().map(|&i| measures[result.folded_indices[i]]).collect();
//! assert_eq!(original, measures);
//! ```
//!
//! ## Performance
//!
//! - Candidate generation is `O(N * max_repeat_len)` for simple repeats and
//!   `O(N * max_repeat_len * max_ending_len^2)` for voltas
//! - Window comparisons are hashed, with an exact check on hash equality
//! - Selection shares chosen lists between DP cells via a [`slotmap`] arena

mod adapter;
mod candidate;
mod error;
mod fold;
mod infer;
mod markers;
mod options;
mod plan;
mod score;
mod select;
mod simple;
mod unroll;
mod volta;
mod window;

#[cfg(test)]
mod tests;

pub use adapter::{SequenceAdapter, SliceAdapter};
pub use error::{FoldError, Result};
pub use infer::{infer_fold_plan, RepeatFolder};
pub use markers::{render_bracketed, Markers, RepeatMarkers};
pub use options::{FoldOptions, ScoringPolicy};
pub use plan::{FoldResult, FoldStats, Plan, Repeat, Volta};
pub use score::{
    Beat, BoundaryKind, Marker, Measure, MeasureFingerprint, Note, ScoreAdapter, Voice,
    DEFAULT_SIGNATURE,
};
pub use unroll::{unroll, unroll_checked, UnrollIter};
