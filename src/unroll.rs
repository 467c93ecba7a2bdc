use crate::error::Result;
use crate::plan::{Plan, Repeat, Volta};
use ahash::AHashMap as HashMap;

/// Iterator that replays a folded sequence in playback order.
///
/// Yields folded indices. Straight-line positions are yielded once; each
/// repeat's interior is walked once per pass, entering a volta only on the
/// passes it allows. This is the single replay routine used both by
/// consumers and by inference to verify its own output.
pub struct UnrollIter<'a> {
    /// Repeats ordered by start
    repeats: Vec<&'a Repeat>,
    next_repeat: usize,
    folded_len: usize,
    /// Next straight-line position
    cursor: usize,
    active: Option<ActivePass<'a>>,
}

/// Position within a repeat being played.
struct ActivePass<'a> {
    repeat: &'a Repeat,
    voltas: HashMap<usize, &'a Volta>,
    pass: u32,
    position: usize,
    /// Remaining `[next, end]` of a volta being emitted
    pending: Option<(usize, usize)>,
}

impl<'a> ActivePass<'a> {
    fn new(repeat: &'a Repeat) -> Self {
        let voltas = repeat.voltas.iter().map(|v| (v.start, v)).collect();
        Self {
            repeat,
            voltas,
            pass: 1,
            position: repeat.start,
            pending: None,
        }
    }

    /// Advances within the repeat, returning `None` once the last pass ends.
    fn next(&mut self) -> Option<usize> {
        loop {
            if let Some((next, end)) = self.pending {
                if next <= end {
                    self.pending = Some((next + 1, end));
                    return Some(next);
                }
                self.pending = None;
            }

            if self.position > self.repeat.end {
                if self.pass >= self.repeat.times {
                    return None;
                }
                self.pass += 1;
                self.position = self.repeat.start;
                continue;
            }

            if let Some(volta) = self.voltas.get(&self.position) {
                if volta.allows(self.pass) {
                    self.pending = Some((volta.start, volta.end));
                }
                self.position = volta.end.max(self.position) + 1;
                continue;
            }

            let position = self.position;
            self.position += 1;
            return Some(position);
        }
    }
}

impl<'a> UnrollIter<'a> {
    pub(crate) fn new(plan: Option<&'a Plan>, folded_len: usize) -> Self {
        let mut repeats: Vec<&Repeat> = plan.map(|p| p.repeats.iter().collect()).unwrap_or_default();
        repeats.sort_by_key(|r| r.start);

        Self {
            repeats,
            next_repeat: 0,
            folded_len,
            cursor: 0,
            active: None,
        }
    }
}

impl<'a> Iterator for UnrollIter<'a> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        loop {
            if let Some(active) = &mut self.active {
                if let Some(position) = active.next() {
                    return Some(position);
                }
                self.cursor = (active.repeat.end + 1).max(active.repeat.start);
                self.active = None;
                self.next_repeat += 1;
                continue;
            }

            if let Some(&repeat) = self.repeats.get(self.next_repeat) {
                if repeat.start < self.cursor {
                    // Overlaps an already played repeat
                    self.next_repeat += 1;
                    continue;
                }
                if repeat.start == self.cursor && self.cursor < self.folded_len {
                    if repeat.times == 0 {
                        self.cursor = (repeat.end + 1).max(repeat.start);
                        self.next_repeat += 1;
                    } else {
                        self.active = Some(ActivePass::new(repeat));
                    }
                    continue;
                }
            }

            if self.cursor < self.folded_len {
                let position = self.cursor;
                self.cursor += 1;
                return Some(position);
            }
            return None;
        }
    }
}

/// Expands a plan into the full ordered list of folded positions.
///
/// With no plan the result is `0..folded_len`.
///
/// # Example
///
/// ```
/// use repeat_fold::{unroll, Plan, Repeat};
///
/// let plan = Plan {
///     repeats: vec![Repeat { start: 0, end: 1, times: 3, voltas: vec![] }],
/// };
/// assert_eq!(unroll(Some(&plan), 3), vec![0, 1, 0, 1, 0, 1, 2]);
/// assert_eq!(unroll(None, 3), vec![0, 1, 2]);
/// ```
pub fn unroll(plan: Option<&Plan>, folded_len: usize) -> Vec<usize> {
    UnrollIter::new(plan, folded_len).collect()
}

/// Like [`unroll`], but rejects plans that break repeat/volta invariants
/// instead of replaying them best-effort. Use for plans read from storage.
pub fn unroll_checked(plan: Option<&Plan>, folded_len: usize) -> Result<Vec<usize>> {
    if let Some(plan) = plan {
        plan.validate(folded_len)?;
    }
    Ok(unroll(plan, folded_len))
}

/// Verifies that replaying `plan` over `folded_indices` reproduces `symbols`.
///
/// Returns the first mismatching unrolled position on failure.
pub(crate) fn verify(
    symbols: &[u32],
    folded_indices: &[usize],
    plan: &Plan,
) -> std::result::Result<(), usize> {
    let mut replayed = UnrollIter::new(Some(plan), folded_indices.len())
        .map(|i| folded_indices.get(i).map(|&original| symbols[original]));

    for (position, &expected) in symbols.iter().enumerate() {
        match replayed.next() {
            Some(Some(actual)) if actual == expected => {}
            _ => return Err(position),
        }
    }
    match replayed.next() {
        None => Ok(()),
        Some(_) => Err(symbols.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FoldError;

    fn simple(start: usize, end: usize, times: u32) -> Repeat {
        Repeat {
            start,
            end,
            times,
            voltas: vec![],
        }
    }

    fn volta(start: usize, end: usize, passes: &[u32]) -> Volta {
        Volta {
            start,
            end,
            allowed_passes: passes.to_vec(),
        }
    }

    #[test]
    fn test_identity_without_plan() {
        assert_eq!(unroll(None, 4), vec![0, 1, 2, 3]);
        assert!(unroll(None, 0).is_empty());
    }

    #[test]
    fn test_empty_plan_is_identity() {
        let plan = Plan::default();
        assert_eq!(unroll(Some(&plan), 3), vec![0, 1, 2]);
    }

    #[test]
    fn test_simple_repeat() {
        let plan = Plan {
            repeats: vec![simple(0, 2, 2)],
        };
        assert_eq!(unroll(Some(&plan), 4), vec![0, 1, 2, 0, 1, 2, 3]);
    }

    #[test]
    fn test_volta_repeat() {
        let mut repeat = simple(0, 3, 2);
        repeat.voltas = vec![volta(2, 2, &[1]), volta(3, 3, &[2])];
        let plan = Plan {
            repeats: vec![repeat],
        };
        assert_eq!(unroll(Some(&plan), 5), vec![0, 1, 2, 0, 1, 3, 4]);
    }

    #[test]
    fn test_volta_on_several_passes() {
        let mut repeat = simple(1, 3, 3);
        repeat.voltas = vec![volta(2, 2, &[1, 2]), volta(3, 3, &[3])];
        let plan = Plan {
            repeats: vec![repeat],
        };
        assert_eq!(
            unroll(Some(&plan), 4),
            vec![0, 1, 2, 1, 2, 1, 3]
        );
    }

    #[test]
    fn test_repeats_in_any_order() {
        let plan = Plan {
            repeats: vec![simple(2, 3, 2), simple(0, 1, 2)],
        };
        assert_eq!(
            unroll(Some(&plan), 5),
            vec![0, 1, 0, 1, 2, 3, 2, 3, 4]
        );
    }

    #[test]
    fn test_overlapping_repeat_is_skipped() {
        let plan = Plan {
            repeats: vec![simple(0, 2, 2), simple(1, 3, 2)],
        };
        assert_eq!(unroll(Some(&plan), 4), vec![0, 1, 2, 0, 1, 2, 3]);
    }

    #[test]
    fn test_zero_times_skips_interior() {
        let plan = Plan {
            repeats: vec![simple(1, 2, 0)],
        };
        assert_eq!(unroll(Some(&plan), 4), vec![0, 3]);
    }

    #[test]
    fn test_malformed_repeats_never_rewind() {
        let backwards = Plan {
            repeats: vec![simple(2, 0, 2)],
        };
        assert_eq!(unroll(Some(&backwards), 4), vec![0, 1, 2, 3]);

        let past_end = Plan {
            repeats: vec![simple(3, 4, 2)],
        };
        assert_eq!(unroll(Some(&past_end), 3), vec![0, 1, 2]);
    }

    #[test]
    fn test_iter_unrolled_matches_unroll() {
        let plan = Plan {
            repeats: vec![simple(1, 2, 3)],
        };
        let collected: Vec<usize> = plan.iter_unrolled(4).collect();
        assert_eq!(collected, unroll(Some(&plan), 4));
    }

    #[test]
    fn test_unroll_checked_rejects_invalid() {
        let plan = Plan {
            repeats: vec![simple(0, 5, 2)],
        };
        assert!(matches!(
            unroll_checked(Some(&plan), 3),
            Err(FoldError::InvalidPlan { .. })
        ));
        assert_eq!(unroll_checked(None, 2).unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_verify() {
        // A B C A B C D folded to A B C D
        let symbols = [0, 1, 2, 0, 1, 2, 3];
        let plan = Plan {
            repeats: vec![simple(0, 2, 2)],
        };
        assert_eq!(verify(&symbols, &[0, 1, 2, 6], &plan), Ok(()));

        let wrong = Plan {
            repeats: vec![simple(0, 1, 2)],
        };
        assert_eq!(verify(&symbols, &[0, 1, 2, 6], &wrong), Err(2));

        let short = Plan {
            repeats: vec![simple(0, 2, 3)],
        };
        assert_eq!(verify(&symbols, &[0, 1, 2, 6], &short), Err(6));
    }
}
