//! Selection of the best non-overlapping set of candidates.
//!
//! Weighted interval scheduling over candidates sorted by `(span_end, start)`.
//! Each DP cell holds a chosen list as the head of a persistent cons list in
//! a [`SlotMap`], so extending a predecessor's list shares its nodes instead
//! of copying them.

use crate::candidate::Candidate;
use slotmap::{DefaultKey, SlotMap};
use std::cmp::Ordering;

/// One link of a chosen-candidate list, pointing back toward its first item.
#[derive(Debug)]
struct ChoiceNode {
    candidate: usize,
    prev: Option<DefaultKey>,
}

/// Best result over a prefix of the sorted candidates.
#[derive(Debug, Clone, Copy, Default)]
struct PlanSet {
    score: i64,
    constructs: u64,
    /// Last chosen candidate
    tail: Option<DefaultKey>,
}

struct Selector<'a> {
    candidates: &'a [Candidate],
    /// Candidate indices ordered by `(span_end, start)`
    order: Vec<usize>,
    nodes: SlotMap<DefaultKey, ChoiceNode>,
}

impl<'a> Selector<'a> {
    fn new(candidates: &'a [Candidate]) -> Self {
        let mut order: Vec<usize> = (0..candidates.len()).collect();
        // Stable: candidates equal on the key keep generation order
        order.sort_by_key(|&i| (candidates[i].span_end, candidates[i].start()));
        Self {
            candidates,
            order,
            nodes: SlotMap::new(),
        }
    }

    /// Index into `order` of the last candidate ending before the i-th
    /// candidate starts.
    fn predecessor(&self, i: usize) -> Option<usize> {
        let start = self.candidates[self.order[i]].start();
        let count = self.order[..i].partition_point(|&c| self.candidates[c].span_end < start);
        count.checked_sub(1)
    }

    fn extend(&mut self, base: PlanSet, candidate: usize) -> PlanSet {
        let c = &self.candidates[candidate];
        let node = self.nodes.insert(ChoiceNode {
            candidate,
            prev: base.tail,
        });
        PlanSet {
            score: base.score.saturating_add(c.score),
            constructs: base.constructs.saturating_add(u64::from(c.constructs)),
            tail: Some(node),
        }
    }

    /// Chosen candidates in the order they were appended.
    fn chosen(&self, set: &PlanSet) -> Vec<usize> {
        let mut chosen = Vec::new();
        let mut current = set.tail;
        while let Some(key) = current {
            let node = &self.nodes[key];
            chosen.push(node.candidate);
            current = node.prev;
        }
        chosen.reverse();
        chosen
    }

    /// Element-wise comparison of two chosen lists; a proper prefix sorts
    /// first.
    fn compare_lists(&self, a: &PlanSet, b: &PlanSet) -> Ordering {
        let a = self.chosen(a);
        let b = self.chosen(b);
        for (&x, &y) in a.iter().zip(&b) {
            let ordering = self.candidates[x].tie_break(&self.candidates[y]);
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        a.len().cmp(&b.len())
    }

    /// Higher score wins, then fewer constructs, then the smaller list.
    /// Full ties go to `a`.
    fn better(&self, a: PlanSet, b: PlanSet) -> PlanSet {
        let ordering = b
            .score
            .cmp(&a.score)
            .then_with(|| a.constructs.cmp(&b.constructs))
            .then_with(|| self.compare_lists(&a, &b));
        if ordering == Ordering::Greater {
            b
        } else {
            a
        }
    }

    fn best_set(mut self) -> Vec<usize> {
        let mut best: Vec<PlanSet> = Vec::with_capacity(self.order.len());
        for i in 0..self.order.len() {
            let base = self
                .predecessor(i)
                .map(|p| best[p])
                .unwrap_or_default();
            let include = self.extend(base, self.order[i]);
            let exclude = i.checked_sub(1).map(|p| best[p]).unwrap_or_default();
            let chosen = self.better(include, exclude);
            best.push(chosen);
        }
        match best.last() {
            Some(set) => self.chosen(set),
            None => Vec::new(),
        }
    }

    fn best_single(mut self) -> Vec<usize> {
        let mut winner: Option<PlanSet> = None;
        for i in 0..self.candidates.len() {
            let set = self.extend(PlanSet::default(), i);
            winner = Some(match winner {
                Some(current) => self.better(current, set),
                None => set,
            });
        }
        winner.map(|set| self.chosen(&set)).unwrap_or_default()
    }
}

/// Chooses the candidates to fold, as indices into `candidates`, ordered by
/// span end.
///
/// With `allow_multiple` the result is the maximum-score non-overlapping
/// set; otherwise it is the single best candidate. Ties are broken by fewer
/// constructs and then by [`Candidate::tie_break`], so the result is fully
/// determined by the candidate list.
pub(crate) fn select(candidates: &[Candidate], allow_multiple: bool) -> Vec<usize> {
    let selector = Selector::new(candidates);
    if allow_multiple {
        selector.best_set()
    } else {
        selector.best_single()
    }
}
