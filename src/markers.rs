//! Repeat annotations for printing a folded sequence.
//!
//! A renderer walks the folded positions in order and, at each one, asks
//! which repeat signs belong there: an opening repeat, the start of an
//! alternate ending, or a closing repeat with its pass count.

use crate::plan::{FoldResult, Plan};
use ahash::AHashMap as HashMap;
use std::fmt::Display;

/// Repeat signs attached to one folded position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markers {
    /// A repeat opens before this position
    pub repeat_open: bool,
    /// An alternate ending for these passes starts here, sorted ascending
    pub volta: Option<Vec<u32>>,
    /// A repeat closes after this position, played this many times
    pub repeat_close: Option<u32>,
}

impl Markers {
    pub fn is_empty(&self) -> bool {
        !self.repeat_open && self.volta.is_none() && self.repeat_close.is_none()
    }

    /// alphaTeX bar metadata: `\ro`, then `\ae`, then `\rc`.
    ///
    /// ```
    /// use repeat_fold::Markers;
    ///
    /// let markers = Markers {
    ///     repeat_open: true,
    ///     volta: Some(vec![1, 2]),
    ///     repeat_close: Some(3),
    /// };
    /// assert_eq!(markers.alphatex(), vec!["\\ro", "\\ae (1 2)", "\\rc 3"]);
    /// ```
    pub fn alphatex(&self) -> Vec<String> {
        let mut tokens = Vec::new();
        if self.repeat_open {
            tokens.push("\\ro".to_string());
        }
        if let Some(passes) = &self.volta {
            tokens.push(match passes.as_slice() {
                [] => "\\ae 1".to_string(),
                [pass] => format!("\\ae {}", pass),
                _ => format!("\\ae ({})", join(passes, " ")),
            });
        }
        if let Some(times) = self.repeat_close {
            tokens.push(format!("\\rc {}", times));
        }
        tokens
    }
}

/// Lookup of repeat signs by folded position.
#[derive(Debug, Clone, Default)]
pub struct RepeatMarkers {
    markers: HashMap<usize, Markers>,
}

impl RepeatMarkers {
    pub fn from_plan(plan: Option<&Plan>) -> Self {
        let mut markers: HashMap<usize, Markers> = HashMap::default();
        for repeat in plan.map_or(&[][..], |p| &p.repeats[..]) {
            markers.entry(repeat.start).or_default().repeat_open = true;
            markers.entry(repeat.end).or_default().repeat_close = Some(repeat.times);
            for volta in &repeat.voltas {
                let mut passes = volta.allowed_passes.clone();
                passes.sort_unstable();
                markers.entry(volta.start).or_default().volta = Some(passes);
            }
        }
        Self { markers }
    }

    /// Signs at a folded position; empty if none.
    pub fn at(&self, folded_index: usize) -> Markers {
        self.markers.get(&folded_index).cloned().unwrap_or_default()
    }
}

/// Renders folded tokens inline with repeat signs, e.g.
/// `|: A B 1.[X] 2.[Y] :| D`.
///
/// `tokens` are indexed by original position.
///
/// # Panics
///
/// Panics if a folded index is out of range for `tokens`.
///
/// ```
/// use repeat_fold::{render_bracketed, RepeatFolder};
///
/// let tokens = ["A", "B", "X", "A", "B", "Y", "D"];
/// let result = RepeatFolder::new().fold_slice(&tokens).unwrap();
/// assert_eq!(render_bracketed(&tokens, &result), "|: A B 1.[X] 2.[Y] :| D");
/// ```
pub fn render_bracketed<T: Display>(tokens: &[T], result: &FoldResult) -> String {
    let folded: Vec<&T> = result.folded_indices.iter().map(|&i| &tokens[i]).collect();
    let repeats = result.plan.as_ref().map_or(&[][..], |p| &p.repeats[..]);
    let markers = RepeatMarkers::from_plan(result.plan.as_ref());
    let volta_end: HashMap<usize, usize> = repeats
        .iter()
        .flat_map(|r| r.voltas.iter().map(|v| (v.start, v.end)))
        .collect();

    let mut out: Vec<String> = Vec::with_capacity(folded.len());
    let mut i = 0;
    while i < folded.len() {
        let at = markers.at(i);
        if at.repeat_open {
            out.push("|:".to_string());
        }

        let last = match (&at.volta, volta_end.get(&i)) {
            (Some(passes), Some(&end)) => {
                let end = end.min(folded.len() - 1).max(i);
                out.push(format!(
                    "{}.[{}]",
                    join(passes, ","),
                    join(&folded[i..=end], " ")
                ));
                end
            }
            _ => {
                out.push(folded[i].to_string());
                i
            }
        };

        // A close sign may sit at the end of a volta rather than its start
        if let Some(times) = (i..=last).find_map(|p| markers.at(p).repeat_close) {
            out.push(if times == 2 {
                ":|".to_string()
            } else {
                format!(":|x{}", times)
            });
        }
        i = last + 1;
    }
    out.join(" ")
}

fn join<T: Display>(items: &[T], separator: &str) -> String {
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(separator)
}
