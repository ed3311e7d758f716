//! Example: Build a curation review queue from a data directory.
//!
//! Usage:
//!   cargo run --example queue -- <data_dir> [character|event]
//!
//! The data directory holds `characters/*.json` and `events/*.json`.

use std::env;
use std::sync::Arc;

use concordance::{Concordance, FileRepository, LexicalAnalyzer};

fn main() -> concordance::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example queue -- <data_dir> [character|event]");
        std::process::exit(1);
    }

    let entity_type = args.get(2).map(String::as_str).unwrap_or("character");
    let repo = FileRepository::new(&args[1])?;
    let engine = Concordance::new(Arc::new(repo)).with_analyzer(Arc::new(LexicalAnalyzer::new()));

    let queue = engine.build_curation_review_queue(entity_type, Some(10), true)?;

    let separator = "=".repeat(80);
    println!("{}", separator);
    println!("Curation queue: {} ({} items)", queue.entity_type, queue.summary.item_count);
    println!("{}", separator);
    println!();

    for (rank, item) in queue.items.iter().enumerate() {
        println!(
            "{:>2}. {:30} {:.2} [{}]",
            rank + 1,
            item.name,
            item.priority_score,
            item.band.label()
        );
        for driver in &item.drivers {
            println!("      - {}", driver);
        }
        for action in &item.recommended_actions {
            println!("      > {}", action);
        }
        println!();
    }

    for item in queue.items.iter().filter(|i| !i.conflicting_fields.is_empty()).take(1) {
        println!("## Conflicts for {}", item.name);
        for record in engine.entity_conflicts(entity_type, &item.entity_id)? {
            println!(
                "  {:24} {:14} {:8} {}",
                record.field,
                record.category.as_str(),
                record.severity.label(),
                record.distinct_values.join(" | ")
            );
        }
    }

    println!(
        "\nMean priority {:.2} (high {}, medium {}, low {})",
        queue.summary.mean_priority,
        queue.summary.bands.high,
        queue.summary.bands.medium,
        queue.summary.bands.low
    );

    Ok(())
}
