use crate::adapter::{SequenceAdapter, SliceAdapter};
use crate::candidate::{Candidate, CandidateKind};
use crate::error::Result;
use crate::fold::build_fold;
use crate::options::FoldOptions;
use crate::plan::FoldResult;
use crate::select::select;
use crate::simple::find_simple_repeats;
use crate::unroll::verify;
use crate::volta::find_voltas;
use crate::window::Sequence;
use std::hash::Hash;

/// Infers a repeat/volta plan for the adapter's sequence.
///
/// Adapter errors are returned as-is. Every other outcome is a valid fold:
/// when nothing pays for itself, or when the proposed plan fails to replay
/// the original sequence exactly, the identity fold is returned.
///
/// # Example
///
/// ```
/// use repeat_fold::{infer_fold_plan, FoldOptions, SliceAdapter};
///
/// let tokens = ["A", "B", "C", "A", "B", "C", "D"];
/// let result = infer_fold_plan(&SliceAdapter::new(&tokens), &FoldOptions::default()).unwrap();
///
/// assert_eq!(result.folded_indices, vec![0, 1, 2, 6]);
/// let repeat = &result.plan.as_ref().unwrap().repeats[0];
/// assert_eq!((repeat.start, repeat.end, repeat.times), (0, 2, 2));
/// ```
pub fn infer_fold_plan<A>(adapter: &A, options: &FoldOptions) -> Result<FoldResult>
where
    A: SequenceAdapter + ?Sized,
{
    let seq = Sequence::from_adapter(adapter)?;
    let len = seq.len();

    let mut candidates = find_simple_repeats(&seq, options);
    candidates.extend(find_voltas(&seq, options));
    log::debug!(
        "{} positions: {} simple repeat and {} volta candidates",
        len,
        candidates
            .iter()
            .filter(|c| c.kind == CandidateKind::Simple)
            .count(),
        candidates
            .iter()
            .filter(|c| c.kind == CandidateKind::Volta)
            .count()
    );

    let chosen: Vec<&Candidate> = select(&candidates, options.allow_multiple_repeats)
        .into_iter()
        .map(|i| &candidates[i])
        .collect();
    if chosen.is_empty() {
        return Ok(FoldResult::identity(len));
    }
    log::debug!(
        "selected {} repeats saving {} positions, score {}, {} constructs",
        chosen.len(),
        chosen
            .iter()
            .map(|c| c.expanded_len - c.printed_len)
            .sum::<usize>(),
        chosen.iter().fold(0i64, |total, c| total.saturating_add(c.score)),
        chosen.iter().map(|c| u64::from(c.constructs)).sum::<u64>()
    );

    let folded = build_fold(&chosen, len);
    Ok(accept_verified(&seq, folded, |position| {
        adapter.debug_label(position)
    }))
}

/// Returns `folded` if replaying its plan reproduces `seq` exactly, and the
/// identity fold otherwise. `label` names a position in the warning.
pub(crate) fn accept_verified<F>(seq: &Sequence, folded: FoldResult, label: F) -> FoldResult
where
    F: Fn(usize) -> String,
{
    let len = seq.len();
    let Some(plan) = &folded.plan else {
        return FoldResult::identity(len);
    };
    if let Err(position) = verify(seq.symbols(), &folded.folded_indices, plan) {
        let label = if position < len {
            label(position)
        } else {
            "end of sequence".to_string()
        };
        log::warn!(
            "fold plan failed verification at position {} ({}); printing unfolded",
            position,
            label
        );
        return FoldResult::identity(len);
    }
    folded
}

/// Repeat inference with a fixed set of options.
///
/// # Example
///
/// ```
/// use repeat_fold::RepeatFolder;
///
/// let folder = RepeatFolder::new();
/// let result = folder.fold_slice(&['A', 'B', 'A', 'B', 'A', 'B', 'C']).unwrap();
///
/// assert_eq!(result.folded_indices, vec![0, 1, 6]);
/// assert_eq!(result.plan.unwrap().repeats[0].times, 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RepeatFolder {
    options: FoldOptions,
}

impl RepeatFolder {
    /// Creates a folder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: FoldOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FoldOptions {
        &self.options
    }

    /// Folds the adapter's sequence.
    pub fn fold<A: SequenceAdapter + ?Sized>(&self, adapter: &A) -> Result<FoldResult> {
        infer_fold_plan(adapter, &self.options)
    }

    /// Folds a slice of fingerprints with no boundaries.
    pub fn fold_slice<T: Hash + Eq>(&self, fingerprints: &[T]) -> Result<FoldResult> {
        self.fold(&SliceAdapter::new(fingerprints))
    }
}
