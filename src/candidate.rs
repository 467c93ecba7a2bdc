use crate::options::ScoringPolicy;
use crate::plan::{Repeat, Volta};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CandidateKind {
    Simple,
    Volta,
}

/// A proposed repeat over original positions `[start, span_end]`.
///
/// `repeat` and its voltas are in original coordinates. Positions inside
/// `skip_ranges` are redundant once the repeat is notated and are dropped
/// from the folded output; the ranges are disjoint and inside the span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Candidate {
    pub kind: CandidateKind,
    pub repeat: Repeat,
    pub skip_ranges: Vec<(usize, usize)>,
    pub expanded_len: usize,
    pub printed_len: usize,
    pub span_end: usize,
    /// Length of the repeated unit (the shared prefix for voltas)
    pub unit_len: usize,
    pub constructs: u32,
    pub score: i64,
}

impl Candidate {
    /// Scores a proposed repeat, returning `None` if it does not pay for itself.
    pub(crate) fn scored(
        repeat: Repeat,
        unit_len: usize,
        skip_ranges: Vec<(usize, usize)>,
        expanded_len: usize,
        printed_len: usize,
        span_end: usize,
        scoring: &ScoringPolicy,
    ) -> Option<Self> {
        let kind = if repeat.voltas.is_empty() {
            CandidateKind::Simple
        } else {
            CandidateKind::Volta
        };
        let constructs = 1 + repeat.voltas.len() as u32;
        let score = scoring.score(expanded_len, printed_len, constructs);
        if score <= 0 {
            return None;
        }
        Some(Self {
            kind,
            repeat,
            skip_ranges,
            expanded_len,
            printed_len,
            span_end,
            unit_len,
            constructs,
            score,
        })
    }

    pub(crate) fn start(&self) -> usize {
        self.repeat.start
    }

    /// Tie-break order between candidates: earlier start, then longer unit,
    /// then fewer constructs, then earlier span end.
    pub(crate) fn tie_break(&self, other: &Self) -> Ordering {
        self.start()
            .cmp(&other.start())
            .then_with(|| other.unit_len.cmp(&self.unit_len))
            .then_with(|| self.constructs.cmp(&other.constructs))
            .then_with(|| self.span_end.cmp(&other.span_end))
    }
}

/// Builds the alternate endings of a two-pass volta repeat.
pub(crate) fn two_endings(first: (usize, usize), second: (usize, usize)) -> Vec<Volta> {
    vec![
        Volta {
            start: first.0,
            end: first.1,
            allowed_passes: vec![1],
        },
        Volta {
            start: second.0,
            end: second.1,
            allowed_passes: vec![2],
        },
    ]
}
