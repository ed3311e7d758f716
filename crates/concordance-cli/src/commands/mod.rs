//! CLI command implementations.

pub mod conflicts;
pub mod impact;
pub mod queue;

use std::path::Path;
use std::sync::Arc;

use concordance::{Concordance, ConcordanceConfig, FileRepository};
use tracing::debug;

/// Open an engine over a data directory.
pub(crate) fn open_engine(
    data_dir: &Path,
    config: ConcordanceConfig,
) -> Result<Concordance, Box<dyn std::error::Error>> {
    debug!(data_dir = %data_dir.display(), "opening repository");
    let repo = FileRepository::new(data_dir)?;
    Ok(Concordance::with_config(Arc::new(repo), config))
}
