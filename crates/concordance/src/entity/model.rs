//! Entity records and per-source attestations.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cache::cache_key;
use crate::error::{ConcordanceError, Result};

/// Kind of entity tracked by the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    /// A figure attested by one or more sources.
    Character,
    /// An event narrated by one or more sources.
    Event,
}

impl EntityType {
    /// All entity types, in listing order.
    pub const ALL: [EntityType; 2] = [EntityType::Character, EntityType::Event];

    /// Lowercase name used in payloads and cache keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Character => "character",
            EntityType::Event => "event",
        }
    }

    /// Directory name used by the flat-file repository.
    pub fn directory(&self) -> &'static str {
        match self {
            EntityType::Character => "characters",
            EntityType::Event => "events",
        }
    }

    /// Parse a caller-supplied entity type, rejecting anything outside the closed set.
    pub fn parse(value: &str) -> Result<Self> {
        value.parse()
    }
}

impl FromStr for EntityType {
    type Err = ConcordanceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "character" => Ok(EntityType::Character),
            "event" => Ok(EntityType::Event),
            other => Err(ConcordanceError::validation(format!(
                "unknown entity type '{}' (expected 'character' or 'event')",
                other
            ))),
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One source's account of an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceAttestation {
    /// Identifier of the attesting source (e.g. "mark").
    #[serde(alias = "source")]
    pub source_id: String,

    /// Field-level values contributed by this source.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub traits: IndexMap<String, Value>,

    /// Free-text summary of the source's account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// Passage references supporting the account.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<String>,
}

impl SourceAttestation {
    /// Create an empty attestation for a source.
    pub fn new(source_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            traits: IndexMap::new(),
            summary: None,
            references: Vec::new(),
        }
    }

    /// Add a trait value.
    pub fn with_trait(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.traits.insert(field.into(), value.into());
        self
    }

    /// Set the summary.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Add a reference.
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.references.push(reference.into());
        self
    }
}

/// A character or event with its per-source attestations.
///
/// Top-level fields other than the named ones (e.g. `roles`, `location`,
/// `participants`) are kept in `attributes`, in file order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Stable identifier.
    pub id: String,

    /// Display name.
    #[serde(default, alias = "canonical_name", alias = "title")]
    pub name: String,

    /// Curated summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// Free-form tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// One attestation per source.
    #[serde(default, alias = "source_profiles", alias = "accounts")]
    pub sources: Vec<SourceAttestation>,

    /// Remaining top-level fields.
    #[serde(flatten)]
    pub attributes: IndexMap<String, Value>,
}

impl Entity {
    /// Create an entity with no attestations.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            summary: None,
            tags: Vec::new(),
            sources: Vec::new(),
            attributes: IndexMap::new(),
        }
    }

    /// Set the summary.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Add a tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Set a top-level attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Add a source attestation.
    pub fn with_source(mut self, source: SourceAttestation) -> Self {
        self.sources.push(source);
        self
    }

    /// Parse an entity from a raw JSON payload.
    pub fn from_json(value: &Value) -> Result<Self> {
        if !value.is_object() {
            return Err(ConcordanceError::validation(
                "entity payload must be a JSON object",
            ));
        }
        let entity: Entity = serde_json::from_value(value.clone())
            .map_err(|e| ConcordanceError::validation(format!("malformed entity payload: {}", e)))?;
        entity.validate()?;
        Ok(entity)
    }

    /// Check structural requirements the engine relies on.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(ConcordanceError::validation("entity id must not be empty"));
        }
        if let Some(source) = self.sources.iter().find(|s| s.source_id.trim().is_empty()) {
            return Err(ConcordanceError::validation(format!(
                "entity '{}' has an attestation without a source id ({} trait(s))",
                self.id,
                source.traits.len()
            )));
        }
        Ok(())
    }

    /// Whether the named top-level attribute carries a non-blank value.
    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes
            .get(key)
            .is_some_and(|v| render_value(v).is_some())
    }

    /// Content hash of the full record, used to address cached analyses.
    pub fn content_hash(&self) -> Result<String> {
        cache_key(self)
    }
}

/// Render a field value for comparison, or `None` if it is blank.
///
/// Strings are trimmed, arrays are joined with ", ", objects use canonical JSON.
pub fn render_value(value: &Value) -> Option<String> {
    let rendered = match value {
        Value::Null => return None,
        Value::String(s) => s.trim().to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(render_value)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(map) if map.is_empty() => return None,
        Value::Object(_) => crate::cache::canonical_json(value),
    };

    if rendered.is_empty() {
        None
    } else {
        Some(rendered)
    }
}
