use repeat_fold::{render_bracketed, Measure, RepeatFolder, RepeatMarkers, ScoreAdapter};
use std::env;
use std::fs;

/// Folds a measure list and prints the result.
///
/// Usage: cargo run --example fold [measures.json]
///
/// Without a file, folds a built-in token sequence.
fn main() {
    let args: Vec<String> = env::args().collect();
    let folder = RepeatFolder::new();

    if args.len() < 2 {
        let tokens = ["A", "B", "X", "A", "B", "Y", "C", "C", "C", "D"];
        let result = folder.fold_slice(&tokens).unwrap_or_else(|e| {
            eprintln!("{}", e);
            std::process::exit(1);
        });
        println!("Input:  {}", tokens.join(" "));
        println!("Folded: {}", render_bracketed(&tokens, &result));
        print_stats(&result);
        return;
    }

    let filename = &args[1];
    let text = fs::read_to_string(filename).unwrap_or_else(|_| {
        eprintln!("File \"{}\" not found.", filename);
        std::process::exit(1);
    });
    let measures: Vec<Measure> = serde_json::from_str(&text).unwrap_or_else(|e| {
        eprintln!("Invalid measure list: {}", e);
        std::process::exit(1);
    });

    let result = folder
        .fold(&ScoreAdapter::new(&measures))
        .unwrap_or_else(|e| {
            eprintln!("{}", e);
            std::process::exit(1);
        });

    let markers = RepeatMarkers::from_plan(result.plan.as_ref());
    for (folded, &original) in result.folded_indices.iter().enumerate() {
        let tokens = markers.at(folded).alphatex();
        println!("m{:<4} {}", original + 1, tokens.join(" "));
    }
    print_stats(&result);
    match result.to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("{}", e),
    }
}

fn print_stats(result: &repeat_fold::FoldResult) {
    let stats = result.stats();
    println!(
        "Printed {} of {} measures ({:.1}%), {} repeats, {} voltas",
        stats.folded_len,
        stats.expanded_len,
        stats.compression_ratio(),
        stats.repeats,
        stats.voltas
    );
}
