//! Fold plans: the repeats and voltas that describe a folded sequence.
//!
//! All coordinates in a [`Plan`] are indices into the folded sequence, not
//! into the original one. [`FoldResult::folded_indices`] maps them back.

use crate::error::{FoldError, Result};
use crate::unroll::{unroll, UnrollIter};
use serde::{Deserialize, Serialize};

/// An alternate ending inside a repeat, played only on some passes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volta {
    pub start: usize,
    pub end: usize,
    /// 1-based pass numbers on which this ending is played.
    pub allowed_passes: Vec<u32>,
}

impl Volta {
    pub fn allows(&self, pass: u32) -> bool {
        self.allowed_passes.contains(&pass)
    }

    /// Number of folded positions the volta covers.
    pub fn width(&self) -> usize {
        (self.end + 1).saturating_sub(self.start)
    }
}

/// A block `[start, end]` played `times` times, with optional voltas.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repeat {
    pub start: usize,
    pub end: usize,
    /// Passes through the block; two when omitted
    #[serde(default = "default_times")]
    pub times: u32,
    #[serde(default)]
    pub voltas: Vec<Volta>,
}

fn default_times() -> u32 {
    2
}

impl Repeat {
    /// Number of positions this repeat expands to when unrolled.
    pub fn expanded_len(&self) -> usize {
        let interior = (self.end + 1).saturating_sub(self.start);
        let shared = interior.saturating_sub(self.voltas.iter().map(Volta::width).sum::<usize>());
        (1..=self.times)
            .map(|pass| {
                shared
                    + self
                        .voltas
                        .iter()
                        .filter(|v| v.allows(pass))
                        .map(Volta::width)
                        .sum::<usize>()
            })
            .sum()
    }
}

/// A set of non-overlapping repeats over a folded sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Plan {
    pub repeats: Vec<Repeat>,
}

impl Plan {
    /// Iterates the folded positions in playback order.
    pub fn iter_unrolled(&self, folded_len: usize) -> UnrollIter<'_> {
        UnrollIter::new(Some(self), folded_len)
    }

    /// Checks the structural invariants of a plan against a folded length:
    /// repeats lie inside the sequence and do not overlap, voltas are
    /// disjoint and inside their repeat, and every volta's passes are a
    /// non-empty subset of `1..=times`.
    pub fn validate(&self, folded_len: usize) -> Result<()> {
        let mut repeats: Vec<(usize, &Repeat)> = self.repeats.iter().enumerate().collect();
        repeats.sort_by_key(|(_, r)| (r.start, r.end));

        let mut previous_end: Option<usize> = None;
        for (index, repeat) in repeats {
            if repeat.start > repeat.end {
                return Err(FoldError::invalid_plan(format!(
                    "repeat {} starts at {} after its end {}",
                    index, repeat.start, repeat.end
                )));
            }
            if repeat.end >= folded_len {
                return Err(FoldError::invalid_plan(format!(
                    "repeat {} ends at {} past folded length {}",
                    index, repeat.end, folded_len
                )));
            }
            if repeat.times == 0 {
                return Err(FoldError::invalid_plan(format!(
                    "repeat {} has zero passes",
                    index
                )));
            }
            if previous_end.is_some_and(|end| repeat.start <= end) {
                return Err(FoldError::invalid_plan(format!(
                    "repeat {} overlaps the preceding repeat",
                    index
                )));
            }
            previous_end = Some(repeat.end);
            validate_voltas(index, repeat)?;
        }
        Ok(())
    }

    /// Original-coordinate `[start, end]` span of every repeat, in the order
    /// the repeats appear in the unrolled sequence.
    pub fn original_spans(&self, folded_len: usize) -> Vec<(usize, usize)> {
        let mut repeats: Vec<&Repeat> = self.repeats.iter().collect();
        repeats.sort_by_key(|r| r.start);

        let mut spans = Vec::with_capacity(repeats.len());
        let mut folded_cursor = 0;
        let mut original_cursor = 0;
        for repeat in repeats {
            if repeat.start < folded_cursor || repeat.end >= folded_len {
                continue;
            }
            original_cursor += repeat.start - folded_cursor;
            let expanded = repeat.expanded_len();
            if expanded > 0 {
                spans.push((original_cursor, original_cursor + expanded - 1));
            }
            original_cursor += expanded;
            folded_cursor = repeat.end + 1;
        }
        spans
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

fn validate_voltas(index: usize, repeat: &Repeat) -> Result<()> {
    let mut voltas: Vec<&Volta> = repeat.voltas.iter().collect();
    voltas.sort_by_key(|v| v.start);

    let mut previous_end: Option<usize> = None;
    for volta in voltas {
        if volta.start > volta.end || volta.start < repeat.start || volta.end > repeat.end {
            return Err(FoldError::invalid_plan(format!(
                "volta [{}, {}] is not inside repeat {} [{}, {}]",
                volta.start, volta.end, index, repeat.start, repeat.end
            )));
        }
        if previous_end.is_some_and(|end| volta.start <= end) {
            return Err(FoldError::invalid_plan(format!(
                "voltas of repeat {} overlap at {}",
                index, volta.start
            )));
        }
        if volta.allowed_passes.is_empty() {
            return Err(FoldError::invalid_plan(format!(
                "volta at {} in repeat {} has no passes",
                volta.start, index
            )));
        }
        if let Some(&pass) = volta
            .allowed_passes
            .iter()
            .find(|&&p| p == 0 || p > repeat.times)
        {
            return Err(FoldError::invalid_plan(format!(
                "volta at {} in repeat {} allows pass {} outside 1..={}",
                volta.start, index, pass, repeat.times
            )));
        }
        previous_end = Some(volta.end);
    }
    Ok(())
}

/// Output of repeat inference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoldResult {
    /// Original positions that must be printed, strictly increasing.
    pub folded_indices: Vec<usize>,
    /// Repeats in folded coordinates, or `None` when nothing was folded.
    pub plan: Option<Plan>,
}

impl FoldResult {
    /// The fold that prints every position once.
    pub fn identity(len: usize) -> Self {
        Self {
            folded_indices: (0..len).collect(),
            plan: None,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.plan.is_none()
    }

    /// Re-expands the fold into original positions in playback order.
    pub fn expand(&self) -> Vec<usize> {
        unroll(self.plan.as_ref(), self.folded_indices.len())
            .into_iter()
            .filter_map(|i| self.folded_indices.get(i).copied())
            .collect()
    }

    pub fn stats(&self) -> FoldStats {
        let repeats = self.plan.as_ref().map_or(&[][..], |p| &p.repeats[..]);
        FoldStats {
            folded_len: self.folded_indices.len(),
            expanded_len: UnrollIter::new(self.plan.as_ref(), self.folded_indices.len()).count(),
            repeats: repeats.len(),
            voltas: repeats.iter().map(|r| r.voltas.len()).sum(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Statistics about a fold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoldStats {
    /// Positions printed
    pub folded_len: usize,
    /// Positions played once unrolled
    pub expanded_len: usize,
    /// Number of repeats in the plan
    pub repeats: usize,
    /// Number of voltas across all repeats
    pub voltas: usize,
}

impl FoldStats {
    /// Returns the printed length as a percentage of the played length.
    pub fn compression_ratio(&self) -> f64 {
        if self.expanded_len == 0 {
            0.0
        } else {
            (self.folded_len as f64 / self.expanded_len as f64) * 100.0
        }
    }
}
