//! Conflicts command - show classified disagreements for one entity.

use std::path::PathBuf;

use colored::Colorize;
use concordance::{ConcordanceConfig, Severity};

pub fn run(
    data_dir: PathBuf,
    entity_type: String,
    id: String,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let engine = super::open_engine(&data_dir, ConcordanceConfig::default())?;
    let conflicts = engine.entity_conflicts(&entity_type, &id)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&conflicts)?);
        return Ok(());
    }

    if conflicts.is_empty() {
        println!("{} Sources agree on every field of {}.", "✓".green(), id.white().bold());
        return Ok(());
    }

    println!(
        "{} {} {}",
        conflicts.len().to_string().white().bold(),
        "conflicting field(s) for".cyan().bold(),
        id.white()
    );

    for record in &conflicts {
        let severity = match record.severity {
            Severity::Critical => record.severity.label().red().bold(),
            Severity::High => record.severity.label().red(),
            Severity::Medium => record.severity.label().yellow(),
            Severity::Low => record.severity.label().blue(),
        };

        println!();
        println!(
            "  {} [{} / {}]",
            record.field.white().bold(),
            record.category.as_str(),
            severity
        );
        for (source, value) in &record.sources {
            println!("    {:12} {}", source.dimmed(), value);
        }
        println!("    {}", record.rationale);
        println!("    {}", record.notes.dimmed());
        for implication in &record.implications {
            println!("    {} {}", "*".cyan(), implication);
        }
    }

    Ok(())
}
