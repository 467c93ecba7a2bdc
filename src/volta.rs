use crate::candidate::{two_endings, Candidate};
use crate::options::FoldOptions;
use crate::plan::Repeat;
use crate::window::Sequence;

/// Finds a shared prefix played twice with a different ending each time.
///
/// The span is laid out as `prefix, ending 1, prefix, ending 2`. The second
/// prefix copy is redundant and skipped; both endings are printed, so they
/// become voltas for pass 1 and pass 2. Equal endings of equal length are a
/// plain repeat and are left to the simple-repeat search.
pub(crate) fn find_voltas(seq: &Sequence, options: &FoldOptions) -> Vec<Candidate> {
    let mut candidates = Vec::new();

    for start in 0..seq.len() {
        let limit = seq.span_limit(start);

        for prefix_len in options.prefix_lens() {
            // Smallest possible span: prefix, 1, prefix, 1
            if start + 2 * prefix_len + 1 > limit {
                break;
            }

            for first_len in options.ending_lens() {
                let second_prefix = start + prefix_len + first_len;
                if second_prefix + prefix_len > limit {
                    break;
                }
                if !seq.windows_equal(start, second_prefix, prefix_len) {
                    continue;
                }

                for second_len in options.ending_lens() {
                    let span_end = second_prefix + prefix_len + second_len - 1;
                    if span_end > limit {
                        break;
                    }
                    let first_ending = start + prefix_len;
                    let second_ending = second_prefix + prefix_len;
                    if first_len == second_len
                        && seq.windows_equal(first_ending, second_ending, first_len)
                    {
                        continue;
                    }

                    debug_assert!(!seq.crosses_boundary(start, span_end));
                    let repeat = Repeat {
                        start,
                        end: span_end,
                        times: 2,
                        voltas: two_endings(
                            (first_ending, first_ending + first_len - 1),
                            (second_ending, span_end),
                        ),
                    };
                    candidates.extend(Candidate::scored(
                        repeat,
                        prefix_len,
                        vec![(second_prefix, second_prefix + prefix_len - 1)],
                        2 * prefix_len + first_len + second_len,
                        prefix_len + first_len + second_len,
                        span_end,
                        &options.scoring,
                    ));
                }
            }
        }
    }

    candidates
}
