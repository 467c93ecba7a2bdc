use crate::candidate::Candidate;
use crate::plan::{FoldResult, Plan, Repeat, Volta};

/// Drops every skipped position and rewrites the chosen repeats in folded
/// coordinates.
///
/// A repeat whose endpoints (or a volta's) land on a skipped position cannot
/// be expressed in folded coordinates and is left out of the plan; the
/// verifier then decides whether the remaining fold is still faithful.
pub(crate) fn build_fold(chosen: &[&Candidate], len: usize) -> FoldResult {
    let mut skipped = vec![false; len];
    for candidate in chosen {
        for &(start, end) in &candidate.skip_ranges {
            for flag in &mut skipped[start..=end] {
                *flag = true;
            }
        }
    }

    let mut folded_indices = Vec::with_capacity(len);
    let mut folded_of: Vec<Option<usize>> = vec![None; len];
    for (position, &skip) in skipped.iter().enumerate() {
        if !skip {
            folded_of[position] = Some(folded_indices.len());
            folded_indices.push(position);
        }
    }

    let mut repeats: Vec<Repeat> = chosen
        .iter()
        .filter_map(|candidate| {
            let translated = translate(&candidate.repeat, &folded_of);
            if translated.is_none() {
                log::trace!(
                    "dropping repeat at {} whose endpoints were folded away",
                    candidate.start()
                );
            }
            translated
        })
        .collect();
    repeats.sort_by_key(|r| r.start);

    let plan = if repeats.is_empty() {
        None
    } else {
        Some(Plan { repeats })
    };
    FoldResult {
        folded_indices,
        plan,
    }
}

fn translate(repeat: &Repeat, folded_of: &[Option<usize>]) -> Option<Repeat> {
    let voltas = repeat
        .voltas
        .iter()
        .map(|volta| {
            Some(Volta {
                start: folded_of[volta.start]?,
                end: folded_of[volta.end]?,
                allowed_passes: volta.allowed_passes.clone(),
            })
        })
        .collect::<Option<Vec<_>>>()?;

    Some(Repeat {
        start: folded_of[repeat.start]?,
        end: folded_of[repeat.end]?,
        times: repeat.times,
        voltas,
    })
}
