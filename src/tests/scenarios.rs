use crate::adapter::SliceAdapter;
use crate::error::FoldError;
use crate::infer::{infer_fold_plan, RepeatFolder};
use crate::markers::{render_bracketed, RepeatMarkers};
use crate::options::FoldOptions;
use crate::plan::{FoldResult, Plan, Repeat};
use crate::score::{Beat, Marker, Measure, Note, ScoreAdapter, Voice};
use crate::unroll::{unroll, unroll_checked};

fn fold(tokens: &[&str]) -> FoldResult {
    RepeatFolder::new().fold_slice(tokens).unwrap()
}

fn spans(result: &FoldResult) -> Vec<(usize, usize, u32)> {
    result
        .plan
        .as_ref()
        .map(|p| p.repeats.iter().map(|r| (r.start, r.end, r.times)).collect())
        .unwrap_or_default()
}

#[test]
fn test_simple_repeat() {
    let tokens = ["A", "B", "C", "A", "B", "C", "D"];
    let result = fold(&tokens);
    assert_eq!(result.folded_indices, vec![0, 1, 2, 6]);
    assert_eq!(spans(&result), vec![(0, 2, 2)]);
    assert_eq!(render_bracketed(&tokens, &result), "|: A B C :| D");
}

#[test]
fn test_volta() {
    let tokens = ["A", "B", "X", "A", "B", "Y", "D"];
    let result = fold(&tokens);
    assert_eq!(result.folded_indices, vec![0, 1, 2, 5, 6]);
    assert_eq!(render_bracketed(&tokens, &result), "|: A B 1.[X] 2.[Y] :| D");
    assert_eq!(
        result.to_json().unwrap(),
        r#"{"foldedIndices":[0,1,2,5,6],"plan":{"repeats":[{"start":0,"end":3,"times":2,"voltas":[{"start":2,"end":2,"allowedPasses":[1]},{"start":3,"end":3,"allowedPasses":[2]}]}]}}"#
    );
}

#[test]
fn test_boundary_blocks_folding() {
    let tokens = ["A", "B", "C", "A", "B", "C", "D"];
    let boundaries = [None, None, None, Some("ts")];
    let adapter = SliceAdapter::new(&tokens).with_boundaries(&boundaries);
    let result = infer_fold_plan(&adapter, &FoldOptions::default()).unwrap();
    assert_eq!(result, FoldResult::identity(7));
    assert_eq!(render_bracketed(&tokens, &result), "A B C A B C D");
}

#[test]
fn test_multi_pass() {
    let tokens = ["A", "B", "A", "B", "A", "B", "C"];
    let result = fold(&tokens);
    assert_eq!(spans(&result), vec![(0, 1, 3)]);
    assert_eq!(result.folded_indices, vec![0, 1, 6]);
    assert_eq!(render_bracketed(&tokens, &result), "|: A B :|x3 C");
}

#[test]
fn test_multiple_independent_repeats() {
    let tokens = ["A", "B", "A", "B", "C", "D", "C", "D", "E"];
    let result = fold(&tokens);
    assert_eq!(result.folded_indices, vec![0, 1, 4, 5, 8]);
    assert_eq!(spans(&result), vec![(0, 1, 2), (2, 3, 2)]);
    assert_eq!(render_bracketed(&tokens, &result), "|: A B :| |: C D :| E");

    let stats = result.stats();
    assert_eq!(stats.repeats, 2);
    assert_eq!(stats.expanded_len, 9);
    assert!((stats.compression_ratio() - 500.0 / 9.0).abs() < 1e-9);
}

#[test]
fn test_alphatex_markers_for_volta() {
    let tokens = ["A", "B", "X", "A", "B", "Y", "D"];
    let result = fold(&tokens);
    let markers = RepeatMarkers::from_plan(result.plan.as_ref());
    let bars: Vec<Vec<String>> = (0..result.folded_indices.len())
        .map(|i| markers.at(i).alphatex())
        .collect();
    assert_eq!(
        bars,
        vec![
            vec!["\\ro".to_string()],
            vec![],
            vec!["\\ae 1".to_string()],
            vec!["\\ae 2".to_string(), "\\rc 2".to_string()],
            vec![],
        ]
    );
}

#[test]
fn test_persisted_plan_replays() {
    let tokens = ["A", "B", "A", "B", "C", "D", "C", "D", "E"];
    let result = fold(&tokens);
    let json = result.plan.as_ref().unwrap().to_json().unwrap();

    let restored = Plan::from_json(&json).unwrap();
    let replayed = unroll_checked(Some(&restored), result.folded_indices.len()).unwrap();
    assert_eq!(replayed, unroll(result.plan.as_ref(), result.folded_indices.len()));
    let original: Vec<&str> = replayed
        .iter()
        .map(|&i| tokens[result.folded_indices[i]])
        .collect();
    assert_eq!(original, tokens);
}

#[test]
fn test_persisted_plan_rejected() {
    let plan = Plan {
        repeats: vec![Repeat {
            start: 2,
            end: 5,
            times: 2,
            voltas: vec![],
        }],
    };
    assert!(matches!(
        unroll_checked(Some(&plan), 4),
        Err(FoldError::InvalidPlan { .. })
    ));
    assert!(matches!(
        Plan::from_json("{\"repeats\": 3}"),
        Err(FoldError::Json(_))
    ));
}

#[test]
fn test_options_from_json() {
    let options: FoldOptions =
        serde_json::from_str(r#"{"minRepeatLen": 1, "allowMultipleRepeats": false}"#).unwrap();
    assert_eq!(options.min_repeat_len, 1);
    assert_eq!(options.max_repeat_len, 16);
    assert!(!options.allow_multiple_repeats);
    assert_eq!(options.scoring.savings_weight, 10);
}

fn riff_measure(fret: u32) -> Measure {
    Measure {
        voices: vec![Voice {
            rest: false,
            beats: vec![Beat {
                duration: Some([1, 4]),
                notes: vec![Note {
                    string: 6,
                    fret: Some(fret),
                    ..Default::default()
                }],
                ..Default::default()
            }],
        }],
        ..Default::default()
    }
}

#[test]
fn test_score_repeats_fold() {
    let measures: Vec<Measure> = [0, 3, 0, 3, 5].into_iter().map(riff_measure).collect();
    let result = RepeatFolder::new().fold(&ScoreAdapter::new(&measures)).unwrap();
    assert_eq!(result.folded_indices, vec![0, 1, 4]);
    assert_eq!(spans(&result), vec![(0, 1, 2)]);
}

#[test]
fn test_score_marker_blocks_folding() {
    let mut measures: Vec<Measure> = [0, 3, 0, 3, 5].into_iter().map(riff_measure).collect();
    measures[2].marker = Some(Marker {
        text: "Verse".to_string(),
    });
    let result = RepeatFolder::new().fold(&ScoreAdapter::new(&measures)).unwrap();
    assert!(result.is_identity());
}

#[test]
fn test_score_tempo_change_blocks_folding() {
    let measures: Vec<Measure> = [0, 3, 0, 3, 5].into_iter().map(riff_measure).collect();
    let adapter = ScoreAdapter::new(&measures).with_tempo_changes([1]);
    let result = RepeatFolder::new().fold(&adapter).unwrap();
    assert!(result.is_identity());
}
