//! Queue command - rank entities by curation priority.

use std::path::PathBuf;
use std::sync::Arc;

use colored::Colorize;
use concordance::{ConcordanceConfig, CurationQueue, LexicalAnalyzer, PriorityBand};
use serde::Serialize;

use crate::cli::{OutputFormat, SemanticChoice};

/// One CSV row per queue item.
#[derive(Serialize)]
struct QueueRow<'a> {
    rank: usize,
    entity_id: &'a str,
    name: &'a str,
    priority_score: f64,
    band: &'static str,
    completeness: f64,
    gaps: usize,
    conflicts: usize,
    high_severity: usize,
    uncertainty: f64,
    drivers: String,
    actions: String,
}

pub fn run(
    data_dir: PathBuf,
    entity_type: String,
    limit: Option<usize>,
    no_cache: bool,
    format: OutputFormat,
    semantic: SemanticChoice,
    config: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = match config {
        Some(path) => ConcordanceConfig::load(path)?,
        None => ConcordanceConfig::default(),
    };
    let config = config.with_semantic(semantic == SemanticChoice::Lexical);

    let engine = super::open_engine(&data_dir, config)?.with_analyzer(Arc::new(LexicalAnalyzer::new()));
    let queue = engine.build_curation_review_queue(&entity_type, limit, !no_cache)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&queue)?),
        OutputFormat::Csv => write_csv(&queue)?,
        OutputFormat::Table => print_table(&queue),
    }

    Ok(())
}

fn write_csv(queue: &CurationQueue) -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = csv::Writer::from_writer(std::io::stdout());
    for (i, item) in queue.items.iter().enumerate() {
        writer.serialize(QueueRow {
            rank: i + 1,
            entity_id: &item.entity_id,
            name: &item.name,
            priority_score: item.priority_score,
            band: item.band.label(),
            completeness: item.metrics.completeness_score,
            gaps: item.metrics.gap_count,
            conflicts: item.metrics.conflict_density,
            high_severity: item.metrics.high_severity_count,
            uncertainty: item.metrics.uncertainty,
            drivers: item.drivers.join("; "),
            actions: item.recommended_actions.join("; "),
        })?;
    }
    writer.flush()?;
    Ok(())
}

fn print_table(queue: &CurationQueue) {
    println!(
        "{} {}",
        "Curation queue for".cyan().bold(),
        format!("{}s", queue.entity_type).white()
    );
    println!();

    if queue.items.is_empty() {
        println!("  No entities found.");
        return;
    }

    for (i, item) in queue.items.iter().enumerate() {
        let score = format!("{:.2}", item.priority_score);
        let score = match item.band {
            PriorityBand::High => score.red().bold(),
            PriorityBand::Medium => score.yellow(),
            PriorityBand::Low => score.green(),
        };
        println!(
            "{:>3}. {} {} {}",
            i + 1,
            score,
            item.name.white().bold(),
            format!("({})", item.entity_id).dimmed()
        );
        for driver in &item.drivers {
            println!("       {} {}", "-".dimmed(), driver);
        }
        for action in &item.recommended_actions {
            println!("       {} {}", "→".cyan(), action);
        }
    }

    let summary = &queue.summary;
    println!();
    println!(
        "{} {} items, mean priority {:.2} (high {}, medium {}, low {})",
        "Summary:".yellow().bold(),
        summary.item_count,
        summary.mean_priority,
        summary.bands.high.to_string().red(),
        summary.bands.medium.to_string().yellow(),
        summary.bands.low.to_string().green()
    );
}
