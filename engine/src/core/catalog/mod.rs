//! Catalog Module
//!
//! In-memory catalogs of effects, transitions and clip animations offered to
//! the user. All three share one ordered, deduplicating store whose first
//! entry is always the kind's "no-op" sentinel.

mod animations;
mod effects;
mod extract;
mod icons;
mod loader;
mod source;
mod transitions;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::core::CoreResult;

pub use animations::AnimationEntry;
pub use effects::EffectEntry;
pub use extract::extract_entries;
pub use icons::icon_for;
pub use loader::{CatalogFiles, CatalogLoader, CatalogStore, LoadOrigin, LoadOutcome};
#[cfg(feature = "remote-sources")]
pub use source::HttpSource;
pub use source::{DocumentSource, FileSource, MemorySource};
pub use transitions::TransitionEntry;

// =============================================================================
// Catalog Item
// =============================================================================

/// Which catalog an entry belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
    Effects,
    Transitions,
    Animations,
}

impl std::fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Effects => "effects",
            Self::Transitions => "transitions",
            Self::Animations => "animations",
        })
    }
}

/// Deduplication key of a catalog entry
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CatalogKey {
    Id(String),
    NameType(String, String),
}

/// An entry that can live in a [`Catalog`].
pub trait CatalogItem: Clone + Serialize + DeserializeOwned {
    const KIND: CatalogKind;

    /// The always-present "no-op" entry
    fn sentinel() -> Self;

    fn id(&self) -> Option<&str>;

    fn name(&self) -> &str;

    fn type_tag(&self) -> Option<&str>;

    /// Fills derived fields (display icon, default duration) left empty.
    fn prepare(&mut self);

    /// Whether an object tagged `type: tag` in an arbitrary document belongs here.
    fn accepts_type(tag: &str) -> bool;

    /// Raw items of this kind inside a draft's `materials`, if the document is a draft.
    fn draft_items(doc: &Value) -> Option<Vec<Value>>;

    /// Built-in entries used when every source fails.
    fn samples() -> Vec<Self>;

    /// Id when present, otherwise name + type.
    fn key(&self) -> Option<CatalogKey> {
        if let Some(id) = self.id().filter(|id| !id.trim().is_empty()) {
            return Some(CatalogKey::Id(id.to_string()));
        }
        let tag = self.type_tag().filter(|t| !t.trim().is_empty())?;
        Some(CatalogKey::NameType(self.name().to_string(), tag.to_string()))
    }

    fn is_sentinel(&self) -> bool {
        self.key().is_some() && self.key() == Self::sentinel().key()
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// What a merge did
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeReport {
    pub added: usize,
    pub updated: usize,
    pub skipped: usize,
}

/// Ordered, deduplicated entries with the sentinel at index 0
#[derive(Clone, Debug)]
pub struct Catalog<T: CatalogItem> {
    entries: Vec<T>,
}

impl<T: CatalogItem> Default for Catalog<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: CatalogItem> Catalog<T> {
    /// Creates a catalog holding only the sentinel
    pub fn new() -> Self {
        let mut sentinel = T::sentinel();
        sentinel.prepare();
        Self {
            entries: vec![sentinel],
        }
    }

    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry with the given id
    pub fn get(&self, id: &str) -> Option<&T> {
        self.entries.iter().find(|e| e.id() == Some(id))
    }

    /// Entry matching `query` by id, else by case-insensitive name
    pub fn find(&self, query: &str) -> Option<&T> {
        self.get(query).or_else(|| {
            self.entries
                .iter()
                .find(|e| e.name().eq_ignore_ascii_case(query))
        })
    }

    /// Upserts candidates by key, keeping positions of existing entries.
    pub fn merge(&mut self, candidates: impl IntoIterator<Item = T>) -> MergeReport {
        let mut report = MergeReport::default();
        let sentinel = T::sentinel();

        for candidate in candidates {
            if candidate.name().trim().is_empty() {
                report.skipped += 1;
                continue;
            }
            // Only the sentinel itself may carry the sentinel's name.
            if !candidate.is_sentinel() && candidate.name().trim().eq_ignore_ascii_case(sentinel.name()) {
                debug!("Skipping {} entry impersonating '{}'", T::KIND, sentinel.name());
                report.skipped += 1;
                continue;
            }
            let Some(key) = candidate.key() else {
                debug!("Skipping {} entry '{}' without id or type", T::KIND, candidate.name());
                report.skipped += 1;
                continue;
            };

            match self.entries.iter().position(|e| e.key().as_ref() == Some(&key)) {
                Some(index) => match shallow_merge(&self.entries[index], &candidate) {
                    Ok(mut merged) => {
                        merged.prepare();
                        self.entries[index] = merged;
                        report.updated += 1;
                    }
                    Err(e) => {
                        warn!("Failed to merge {} entry '{}': {}", T::KIND, candidate.name(), e);
                        report.skipped += 1;
                    }
                },
                None => {
                    let mut entry = candidate;
                    entry.prepare();
                    self.entries.push(entry);
                    report.added += 1;
                }
            }
        }

        self.ensure_sentinel();
        report
    }

    /// Puts the sentinel back at index 0 if it went missing or moved.
    pub fn ensure_sentinel(&mut self) {
        if self.entries.first().is_some_and(T::is_sentinel) {
            return;
        }
        let sentinel = match self.entries.iter().position(T::is_sentinel) {
            Some(index) => self.entries.remove(index),
            None => {
                let mut sentinel = T::sentinel();
                sentinel.prepare();
                sentinel
            }
        };
        self.entries.insert(0, sentinel);
    }
}

/// Overlays the non-null top-level fields of `patch` onto `base`.
pub fn shallow_merge<T: Serialize + DeserializeOwned>(base: &T, patch: &T) -> CoreResult<T> {
    let mut merged = serde_json::to_value(base)?;
    if let (Value::Object(target), Value::Object(fields)) = (&mut merged, serde_json::to_value(patch)?) {
        for (key, value) in fields {
            if !value.is_null() {
                target.insert(key, value);
            }
        }
    }
    Ok(serde_json::from_value(merged)?)
}

/// Converts a catalog entry into the descriptor the draft appliers take.
pub fn to_descriptor<D: DeserializeOwned>(entry: &impl Serialize) -> CoreResult<D> {
    Ok(serde_json::from_value(serde_json::to_value(entry)?)?)
}
