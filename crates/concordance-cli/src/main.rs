//! Concordance CLI - curation queue and conflict reports for multi-source records.

mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Queue {
            data_dir,
            entity_type,
            limit,
            no_cache,
            format,
            semantic,
            config,
        } => commands::queue::run(
            data_dir,
            entity_type,
            limit,
            no_cache,
            format,
            semantic,
            config,
        ),

        Commands::Conflicts {
            data_dir,
            entity_type,
            id,
            json,
        } => commands::conflicts::run(data_dir, entity_type, id, json),

        Commands::Impact {
            before,
            after,
            entity_type,
            json,
        } => commands::impact::run(before, after, entity_type, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
