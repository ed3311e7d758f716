//! Entity repositories: in-memory and flat-file.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use crate::error::{ConcordanceError, Result};

use super::model::{Entity, EntityType};

/// Read access to characters and events.
///
/// `list` must return entities in a deterministic order; the curation queue
/// uses it to break priority ties.
pub trait EntityRepository: Send + Sync {
    /// Fetch one entity, or `ConcordanceError::NotFound`.
    fn get(&self, entity_type: EntityType, id: &str) -> Result<Entity>;

    /// List every entity of a type in repository order.
    fn list(&self, entity_type: EntityType) -> Result<Vec<Entity>>;

    fn get_character(&self, id: &str) -> Result<Entity> {
        self.get(EntityType::Character, id)
    }

    fn get_event(&self, id: &str) -> Result<Entity> {
        self.get(EntityType::Event, id)
    }

    fn list_all_characters(&self) -> Result<Vec<Entity>> {
        self.list(EntityType::Character)
    }

    fn list_all_events(&self) -> Result<Vec<Entity>> {
        self.list(EntityType::Event)
    }
}

/// Repository held in memory, listed in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    characters: IndexMap<String, Entity>,
    events: IndexMap<String, Entity>,
}

impl InMemoryRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entity. Replacing keeps the original position.
    pub fn insert(&mut self, entity_type: EntityType, entity: Entity) {
        self.table_mut(entity_type).insert(entity.id.clone(), entity);
    }

    /// Builder form of `insert` for characters.
    pub fn with_character(mut self, entity: Entity) -> Self {
        self.insert(EntityType::Character, entity);
        self
    }

    /// Builder form of `insert` for events.
    pub fn with_event(mut self, entity: Entity) -> Self {
        self.insert(EntityType::Event, entity);
        self
    }

    fn table(&self, entity_type: EntityType) -> &IndexMap<String, Entity> {
        match entity_type {
            EntityType::Character => &self.characters,
            EntityType::Event => &self.events,
        }
    }

    fn table_mut(&mut self, entity_type: EntityType) -> &mut IndexMap<String, Entity> {
        match entity_type {
            EntityType::Character => &mut self.characters,
            EntityType::Event => &mut self.events,
        }
    }
}

impl EntityRepository for InMemoryRepository {
    fn get(&self, entity_type: EntityType, id: &str) -> Result<Entity> {
        self.table(entity_type)
            .get(id)
            .cloned()
            .ok_or_else(|| ConcordanceError::not_found(entity_type.as_str(), id))
    }

    fn list(&self, entity_type: EntityType) -> Result<Vec<Entity>> {
        Ok(self.table(entity_type).values().cloned().collect())
    }
}

/// Repository backed by JSON files.
///
/// ```text
/// data/
/// ├── characters/
/// │   ├── peter.json
/// │   └── paul.json
/// └── events/
///     └── empty_tomb.json
/// ```
///
/// Each file holds one entity object or an array of them. Files are read in
/// file-name order; entities within a file keep their array order.
#[derive(Debug, Clone)]
pub struct FileRepository {
    root: PathBuf,
}

impl FileRepository {
    /// Open a repository rooted at `root`.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(ConcordanceError::Config(format!(
                "data directory '{}' does not exist",
                root.display()
            )));
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// Root directory of the repository.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entity_files(&self, entity_type: EntityType) -> Result<Vec<PathBuf>> {
        let dir = self.root.join(entity_type.directory());
        if !dir.is_dir() {
            debug!(dir = %dir.display(), "entity directory missing, treating as empty");
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&dir).map_err(|e| ConcordanceError::Io {
            path: dir.clone(),
            source: e,
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ConcordanceError::Io {
                path: dir.clone(),
                source: e,
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    fn load_file(path: &Path) -> Result<Vec<Entity>> {
        let contents = fs::read_to_string(path).map_err(|e| ConcordanceError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let value: Value = serde_json::from_str(&contents)?;

        let payloads = match value {
            Value::Array(items) => items,
            other => vec![other],
        };

        payloads
            .iter()
            .map(|payload| {
                Entity::from_json(payload).map_err(|e| {
                    ConcordanceError::validation(format!("{}: {}", path.display(), e))
                })
            })
            .collect()
    }
}

impl EntityRepository for FileRepository {
    fn get(&self, entity_type: EntityType, id: &str) -> Result<Entity> {
        let direct = self
            .root
            .join(entity_type.directory())
            .join(format!("{}.json", id));
        if direct.is_file() {
            if let Some(entity) = Self::load_file(&direct)?.into_iter().find(|e| e.id == id) {
                return Ok(entity);
            }
        }

        self.list(entity_type)?
            .into_iter()
            .find(|e| e.id == id)
            .ok_or_else(|| ConcordanceError::not_found(entity_type.as_str(), id))
    }

    fn list(&self, entity_type: EntityType) -> Result<Vec<Entity>> {
        let mut entities = Vec::new();
        for path in self.entity_files(entity_type)? {
            entities.extend(Self::load_file(&path)?);
        }
        debug!(entity_type = %entity_type, count = entities.len(), "listed entities");
        Ok(entities)
    }
}
