//! Entities and the repositories that supply them.
//!
//! Entities are read-only inputs to the engine. A repository lists every
//! character or event in a deterministic order and fetches single records by id.

mod model;
mod repository;

pub use model::{render_value, Entity, EntityType, SourceAttestation};
pub use repository::{EntityRepository, FileRepository, InMemoryRepository};
