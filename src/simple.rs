use crate::candidate::Candidate;
use crate::options::FoldOptions;
use crate::plan::Repeat;
use crate::window::Sequence;

/// Finds blocks repeated verbatim two or more times back to back.
///
/// Every `(start, unit length)` pair with at least two consecutive equal
/// units yields its own candidate, extended greedily to the largest count
/// that fits before the next boundary. Shorter counts at the same start are
/// not emitted; a later start covers them. The selector picks among all of
/// them, so nothing is pruned for being locally weaker.
pub(crate) fn find_simple_repeats(seq: &Sequence, options: &FoldOptions) -> Vec<Candidate> {
    let mut candidates = Vec::new();

    for start in 0..seq.len() {
        let limit = seq.span_limit(start);

        for unit_len in options.repeat_lens() {
            // Second copy must end by the limit; longer units only end later
            if start + 2 * unit_len - 1 > limit {
                break;
            }
            if !seq.windows_equal(start, start + unit_len, unit_len) {
                continue;
            }

            let mut count = 2;
            while start + (count + 1) * unit_len - 1 <= limit
                && seq.windows_equal(start, start + count * unit_len, unit_len)
            {
                count += 1;
            }

            let span_end = start + count * unit_len - 1;
            debug_assert!(!seq.crosses_boundary(start, span_end));
            let repeat = Repeat {
                start,
                end: start + unit_len - 1,
                times: count as u32,
                voltas: Vec::new(),
            };
            candidates.extend(Candidate::scored(
                repeat,
                unit_len,
                vec![(start + unit_len, span_end)],
                unit_len * count,
                unit_len,
                span_end,
                &options.scoring,
            ));
        }
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequence(tokens: &str, boundaries: &[usize]) -> Sequence {
        let symbols = tokens.bytes().map(u32::from).collect::<Vec<_>>();
        let mut marks = vec![false; symbols.len()];
        for &b in boundaries {
            marks[b] = true;
        }
        Sequence::from_parts(symbols, marks)
    }

    fn spans(candidates: &[Candidate]) -> Vec<(usize, usize, u32, usize)> {
        candidates
            .iter()
            .map(|c| (c.start(), c.unit_len, c.repeat.times, c.span_end))
            .collect()
    }

    #[test]
    fn test_abcabc() {
        let found = find_simple_repeats(&sequence("abcabcd", &[]), &FoldOptions::default());
        assert_eq!(spans(&found), vec![(0, 3, 2, 5)]);
        assert_eq!(found[0].skip_ranges, vec![(3, 5)]);
        assert_eq!(found[0].expanded_len, 6);
        assert_eq!(found[0].printed_len, 3);
    }

    #[test]
    fn test_three_passes() {
        let found = find_simple_repeats(&sequence("abababc", &[]), &FoldOptions::default());
        assert_eq!(
            spans(&found),
            vec![(0, 2, 3, 5), (1, 2, 2, 4), (2, 2, 2, 5)]
        );
        assert_eq!(found[0].skip_ranges, vec![(2, 5)]);
    }

    #[test]
    fn test_exhaustive_over_unit_lengths() {
        let options = FoldOptions::default().with_repeat_len(1, 16);
        let found = find_simple_repeats(&sequence("aaaa", &[]), &options);
        assert_eq!(
            spans(&found),
            vec![
                (0, 1, 4, 3),
                (0, 2, 2, 3),
                (1, 1, 3, 3),
                (2, 1, 2, 3)
            ]
        );
    }

    #[test]
    fn test_boundary_blocks_second_copy() {
        let found = find_simple_repeats(&sequence("abcabcd", &[3]), &FoldOptions::default());
        assert!(found.is_empty());
    }

    #[test]
    fn test_boundary_caps_count() {
        // Third copy would cross the boundary at 4
        let found = find_simple_repeats(&sequence("ababab", &[4]), &FoldOptions::default());
        assert_eq!(spans(&found), vec![(0, 2, 2, 3)]);
    }

    #[test]
    fn test_span_may_start_on_boundary() {
        let found = find_simple_repeats(&sequence("xabab", &[1]), &FoldOptions::default());
        assert_eq!(spans(&found), vec![(1, 2, 2, 4)]);
    }

    #[test]
    fn test_degenerate_options() {
        let options = FoldOptions::default().with_repeat_len(4, 2);
        assert!(find_simple_repeats(&sequence("abababab", &[]), &options).is_empty());
    }

    #[test]
    fn test_empty_and_short() {
        let options = FoldOptions::default();
        assert!(find_simple_repeats(&sequence("", &[]), &options).is_empty());
        assert!(find_simple_repeats(&sequence("ab", &[]), &options).is_empty());
    }
}
