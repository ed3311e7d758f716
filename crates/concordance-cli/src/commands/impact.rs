//! Impact command - preview how an edit changes curation metrics.

use std::fs;
use std::path::{Path, PathBuf};

use colored::Colorize;
use concordance::EditImpact;
use serde_json::Value;

fn read_payload(path: &Path) -> Result<Value, Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let value = serde_json::from_str(&contents)
        .map_err(|e| format!("Invalid JSON in {}: {}", path.display(), e))?;
    Ok(value)
}

pub fn run(
    before: PathBuf,
    after: PathBuf,
    entity_type: String,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let before_value = read_payload(&before)?;
    let after_value = read_payload(&after)?;

    let impact = concordance::describe_json_edit_impact(&before_value, &after_value, &entity_type)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&impact)?);
    } else {
        print_impact(&impact);
    }

    Ok(())
}

fn print_impact(impact: &EditImpact) {
    let before = &impact.before_metrics;
    let after = &impact.after_metrics;

    println!("{}", "Edit impact".cyan().bold());
    println!();
    println!("  {:22} {:>8} {:>8}", "", "before", "after");
    println!(
        "  {:22} {:>7.0}% {:>7.0}%",
        "completeness",
        before.completeness_score * 100.0,
        after.completeness_score * 100.0
    );
    println!("  {:22} {:>8} {:>8}", "missing fields", before.gap_count, after.gap_count);
    println!(
        "  {:22} {:>8} {:>8}",
        "conflicting fields", before.conflict_density, after.conflict_density
    );
    println!(
        "  {:22} {:>8} {:>8}",
        "high-severity", before.high_severity_count, after.high_severity_count
    );
    println!("  {:22} {:>8.2} {:>8.2}", "uncertainty", before.uncertainty, after.uncertainty);
    println!(
        "  {:22} {:>8.2} {:>8.2}",
        "priority", before.priority_score, after.priority_score
    );
    println!();

    let improving = impact.deltas.priority_score < 0.0;
    for line in &impact.narrative_lines {
        if impact.deltas.is_zero() {
            println!("  {}", line.dimmed());
        } else if improving {
            println!("  {}", line.green());
        } else {
            println!("  {}", line.yellow());
        }
    }
}
