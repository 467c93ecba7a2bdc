use crate::error::{FoldError, Result};
use std::hash::Hash;

/// Read-only view of a sequence of measures as seen by the folding engine.
///
/// The engine never inspects measure content. It only needs to know which
/// positions are interchangeable (equal fingerprints) and where repeats may
/// not reach across (non-null boundaries).
pub trait SequenceAdapter {
    /// Canonical summary of one position. Two positions fold together iff
    /// their fingerprints are equal.
    type Fingerprint: Hash + Eq;

    /// Opaque tag for a hard boundary (time signature change, marker, ...).
    type Boundary;

    /// Number of positions in the sequence.
    fn len(&self) -> usize;

    /// Returns true if the sequence has no positions.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fingerprint of the position, for `position < len()`.
    fn fingerprint(&self, position: usize) -> Result<Self::Fingerprint>;

    /// Boundary marker at the position, if any.
    ///
    /// A span may start at a boundary but must not contain one anywhere else.
    fn boundary(&self, _position: usize) -> Result<Option<Self::Boundary>> {
        Ok(None)
    }

    /// Human readable label used in diagnostics.
    fn debug_label(&self, position: usize) -> String {
        format!("m{}", position + 1)
    }
}

/// Adapter over a slice of fingerprints with optional boundary markers.
///
/// # Example
///
/// ```
/// use repeat_fold::{SequenceAdapter, SliceAdapter};
///
/// let tokens = ["A", "B", "C", "A", "B", "C", "D"];
/// let boundaries = [None, None, None, Some("ts")];
/// let adapter = SliceAdapter::new(&tokens).with_boundaries(&boundaries);
///
/// assert_eq!(adapter.len(), 7);
/// assert_eq!(adapter.boundary(3).unwrap(), Some(&"ts"));
/// assert_eq!(adapter.boundary(6).unwrap(), None);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SliceAdapter<'a, T, B = ()> {
    fingerprints: &'a [T],
    boundaries: &'a [Option<B>],
}

impl<'a, T: Hash + Eq> SliceAdapter<'a, T, ()> {
    /// Creates an adapter with no boundaries.
    pub fn new(fingerprints: &'a [T]) -> Self {
        Self {
            fingerprints,
            boundaries: &[],
        }
    }
}

impl<'a, T: Hash + Eq, B> SliceAdapter<'a, T, B> {
    /// Attaches boundary markers. Missing trailing entries mean no boundary.
    pub fn with_boundaries<B2>(self, boundaries: &'a [Option<B2>]) -> SliceAdapter<'a, T, B2> {
        SliceAdapter {
            fingerprints: self.fingerprints,
            boundaries,
        }
    }
}

impl<'a, T: Hash + Eq, B> SequenceAdapter for SliceAdapter<'a, T, B> {
    type Fingerprint = &'a T;
    type Boundary = &'a B;

    fn len(&self) -> usize {
        self.fingerprints.len()
    }

    fn fingerprint(&self, position: usize) -> Result<&'a T> {
        self.fingerprints
            .get(position)
            .ok_or(FoldError::PositionOutOfRange {
                position,
                len: self.fingerprints.len(),
            })
    }

    fn boundary(&self, position: usize) -> Result<Option<&'a B>> {
        if position >= self.fingerprints.len() {
            return Err(FoldError::PositionOutOfRange {
                position,
                len: self.fingerprints.len(),
            });
        }
        Ok(self.boundaries.get(position).and_then(Option::as_ref))
    }
}
