//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Concordance: cross-source conflict detection and curation priorities
#[derive(Parser)]
#[command(name = "concordance")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank entities by curation priority
    Queue {
        /// Directory holding characters/*.json and events/*.json
        #[arg(value_name = "DATA_DIR")]
        data_dir: PathBuf,

        /// Entity type to rank (character or event)
        #[arg(short = 't', long = "type", default_value = "character")]
        entity_type: String,

        /// Maximum number of items to show
        #[arg(short, long)]
        limit: Option<usize>,

        /// Bypass every cache layer
        #[arg(long)]
        no_cache: bool,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,

        /// Semantic analyzer used to refine uncertainty
        #[arg(long, default_value = "lexical")]
        semantic: SemanticChoice,

        /// Engine configuration file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show classified conflicts for one entity
    Conflicts {
        /// Directory holding characters/*.json and events/*.json
        #[arg(value_name = "DATA_DIR")]
        data_dir: PathBuf,

        /// Entity type (character or event)
        #[arg(short = 't', long = "type")]
        entity_type: String,

        /// Entity id
        #[arg(long)]
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Preview how an edit changes curation metrics
    Impact {
        /// Entity record before the edit
        #[arg(long, value_name = "FILE")]
        before: PathBuf,

        /// Entity record after the edit
        #[arg(long, value_name = "FILE")]
        after: PathBuf,

        /// Entity type (character or event)
        #[arg(short = 't', long = "type")]
        entity_type: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use table, json, or csv.", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Semantic analyzer choice
#[derive(Clone, Debug, Default, PartialEq)]
pub enum SemanticChoice {
    /// Word-overlap heuristic
    #[default]
    Lexical,
    /// Structural uncertainty only
    None,
}

impl std::str::FromStr for SemanticChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lexical" => Ok(SemanticChoice::Lexical),
            "none" | "off" => Ok(SemanticChoice::None),
            _ => Err(format!("Unknown analyzer: {}. Use: lexical or none.", s)),
        }
    }
}

impl std::fmt::Display for SemanticChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SemanticChoice::Lexical => write!(f, "lexical"),
            SemanticChoice::None => write!(f, "none"),
        }
    }
}
