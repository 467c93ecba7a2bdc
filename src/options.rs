use serde::{Deserialize, Serialize};

/// How candidates are scored.
///
/// `score = saved * savings_weight - constructs * construct_penalty`, where
/// `saved` is the number of positions the construct removes from the printed
/// form and `constructs` counts the repeat marker plus one per volta.
/// Candidates scoring zero or less are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScoringPolicy {
    pub savings_weight: i64,
    pub construct_penalty: i64,
}

impl ScoringPolicy {
    pub fn score(&self, expanded_len: usize, printed_len: usize, constructs: u32) -> i64 {
        // Extreme weights saturate instead of wrapping
        let saved = expanded_len as i64 - printed_len as i64;
        saved
            .saturating_mul(self.savings_weight)
            .saturating_sub(i64::from(constructs).saturating_mul(self.construct_penalty))
    }
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            savings_weight: 10,
            construct_penalty: 1,
        }
    }
}

/// Search limits for repeat inference.
///
/// Inconsistent limits (a maximum below its minimum) simply produce no
/// candidates of the affected kind.
///
/// ```
/// use repeat_fold::FoldOptions;
///
/// let options: FoldOptions = serde_json::from_str(r#"{"maxRepeatLen": 4}"#).unwrap();
/// assert_eq!(options.max_repeat_len, 4);
/// assert_eq!(options.min_repeat_len, 2);
/// assert!(options.allow_multiple_repeats);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FoldOptions {
    /// Shortest unit considered for a simple repeat
    pub min_repeat_len: usize,
    /// Longest unit for a simple repeat, and longest shared prefix for a volta
    pub max_repeat_len: usize,
    /// Shortest shared prefix for a volta
    pub min_prefix_len: usize,
    /// Longest alternate ending
    pub max_ending_len: usize,
    /// If false, at most one repeat is chosen for the whole sequence
    pub allow_multiple_repeats: bool,
    pub scoring: ScoringPolicy,
}

impl Default for FoldOptions {
    fn default() -> Self {
        Self {
            min_repeat_len: 2,
            max_repeat_len: 16,
            min_prefix_len: 2,
            max_ending_len: 8,
            allow_multiple_repeats: true,
            scoring: ScoringPolicy::default(),
        }
    }
}

impl FoldOptions {
    pub fn with_repeat_len(mut self, min: usize, max: usize) -> Self {
        self.min_repeat_len = min;
        self.max_repeat_len = max;
        self
    }

    pub fn with_min_prefix_len(mut self, min: usize) -> Self {
        self.min_prefix_len = min;
        self
    }

    pub fn with_max_ending_len(mut self, max: usize) -> Self {
        self.max_ending_len = max;
        self
    }

    pub fn with_multiple_repeats(mut self, allow: bool) -> Self {
        self.allow_multiple_repeats = allow;
        self
    }

    pub fn with_scoring(mut self, scoring: ScoringPolicy) -> Self {
        self.scoring = scoring;
        self
    }

    /// Unit lengths searched for simple repeats. Zero-length units are never
    /// searched.
    pub(crate) fn repeat_lens(&self) -> std::ops::RangeInclusive<usize> {
        self.min_repeat_len.max(1)..=self.max_repeat_len
    }

    pub(crate) fn prefix_lens(&self) -> std::ops::RangeInclusive<usize> {
        self.min_prefix_len.max(1)..=self.max_repeat_len
    }

    pub(crate) fn ending_lens(&self) -> std::ops::RangeInclusive<usize> {
        1..=self.max_ending_len
    }
}
