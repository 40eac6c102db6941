//! Catalog Loader
//!
//! Fills catalogs from document sources. For each catalog kind the loader
//! tries the draft document first, then the kind's own catalog file, asking
//! every source in order. The first document that yields entries wins.
//! When nothing does, the built-in samples are merged instead.

use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::{
    extract_entries, AnimationEntry, Catalog, CatalogItem, CatalogKind, DocumentSource,
    EffectEntry, FileSource, MergeReport, TransitionEntry,
};
use crate::core::settings::CatalogSettings;
use crate::core::{CoreError, CoreResult};

/// Document names the loader asks sources for
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogFiles {
    pub draft: String,
    pub effects: String,
    pub transitions: String,
    pub animations: String,
}

impl Default for CatalogFiles {
    fn default() -> Self {
        Self {
            draft: "draft_content.json".to_string(),
            effects: "effects.json".to_string(),
            transitions: "transitions.json".to_string(),
            animations: "animations.json".to_string(),
        }
    }
}

impl CatalogFiles {
    pub fn for_kind(&self, kind: CatalogKind) -> &str {
        match kind {
            CatalogKind::Effects => &self.effects,
            CatalogKind::Transitions => &self.transitions,
            CatalogKind::Animations => &self.animations,
        }
    }
}

/// Where a catalog's entries came from
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LoadOrigin {
    Source { source: String, document: String },
    Samples,
}

/// Result of loading one catalog
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadOutcome {
    pub catalog: CatalogKind,
    pub origin: LoadOrigin,
    pub report: MergeReport,
}

/// Loads catalogs from an ordered chain of sources
pub struct CatalogLoader {
    sources: Vec<Box<dyn DocumentSource>>,
    files: CatalogFiles,
    timeout: Duration,
}

impl CatalogLoader {
    pub fn new(timeout: Duration) -> Self {
        Self {
            sources: Vec::new(),
            files: CatalogFiles::default(),
            timeout,
        }
    }

    /// Builds the source chain from settings: local files first, then remote.
    ///
    /// `fallback_dirs` are searched after the configured source directories.
    pub fn from_settings(settings: &CatalogSettings, fallback_dirs: Vec<PathBuf>) -> CoreResult<Self> {
        let timeout = Duration::from_millis(settings.fetch_timeout_ms);
        let mut dirs: Vec<PathBuf> = settings.source_dirs.iter().map(PathBuf::from).collect();
        for dir in fallback_dirs {
            if !dirs.contains(&dir) {
                dirs.push(dir);
            }
        }

        #[cfg_attr(not(feature = "remote-sources"), allow(unused_mut))]
        let mut loader = Self::new(timeout)
            .with_files(CatalogFiles {
                draft: settings.draft_file.clone(),
                effects: settings.effects_file.clone(),
                transitions: settings.transitions_file.clone(),
                animations: settings.animations_file.clone(),
            })
            .with_source(Box::new(FileSource::new(dirs)));

        if let Some(base_url) = settings.remote_base_url.as_deref().filter(|u| !u.trim().is_empty()) {
            #[cfg(feature = "remote-sources")]
            {
                let http = super::HttpSource::new(base_url, timeout)?;
                loader = loader.with_source(Box::new(http));
            }
            #[cfg(not(feature = "remote-sources"))]
            warn!("Ignoring remote catalog URL {}: remote sources are disabled", base_url);
        }

        Ok(loader)
    }

    pub fn with_source(mut self, source: Box<dyn DocumentSource>) -> Self {
        self.sources.push(source);
        self
    }

    pub fn with_files(mut self, files: CatalogFiles) -> Self {
        self.files = files;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn fetch(&self, source: &dyn DocumentSource, name: &str) -> CoreResult<serde_json::Value> {
        match tokio::time::timeout(self.timeout, source.fetch(name)).await {
            Ok(result) => result,
            Err(_) => Err(CoreError::Timeout(format!(
                "{} did not answer for {} within {:?}",
                source.describe(),
                name,
                self.timeout
            ))),
        }
    }

    /// Merges entries into `catalog` from the first source that has any.
    pub async fn load<T: CatalogItem>(&self, catalog: &mut Catalog<T>) -> LoadOutcome {
        let mut documents = vec![self.files.draft.as_str()];
        let own = self.files.for_kind(T::KIND);
        if own != self.files.draft {
            documents.push(own);
        }

        for document in documents {
            for source in &self.sources {
                let doc = match self.fetch(source.as_ref(), document).await {
                    Ok(doc) => doc,
                    Err(CoreError::SourceNotFound(_)) => continue,
                    Err(e) if e.is_fallback_trigger() => {
                        warn!("Catalog source {} failed for {}: {}", source.describe(), document, e);
                        continue;
                    }
                    Err(e) => {
                        warn!("Unexpected error from {}: {}", source.describe(), e);
                        continue;
                    }
                };

                let entries = extract_entries::<T>(&doc);
                if entries.is_empty() {
                    debug!("{} from {} has no {} entries", document, source.describe(), T::KIND);
                    continue;
                }

                let report = catalog.merge(entries);
                info!(
                    "Loaded {} catalog from {} ({}): {} added, {} updated, {} skipped",
                    T::KIND,
                    source.describe(),
                    document,
                    report.added,
                    report.updated,
                    report.skipped
                );
                return LoadOutcome {
                    catalog: T::KIND,
                    origin: LoadOrigin::Source {
                        source: source.describe(),
                        document: document.to_string(),
                    },
                    report,
                };
            }
        }

        let report = catalog.merge(T::samples());
        info!("No {} catalog source available, using built-in samples", T::KIND);
        LoadOutcome {
            catalog: T::KIND,
            origin: LoadOrigin::Samples,
            report,
        }
    }
}

// =============================================================================
// Catalog Store
// =============================================================================

/// The three catalogs the application offers
#[derive(Clone, Debug, Default)]
pub struct CatalogStore {
    pub effects: Catalog<EffectEntry>,
    pub transitions: Catalog<TransitionEntry>,
    pub animations: Catalog<AnimationEntry>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store populated only from the built-in samples
    pub fn with_samples() -> Self {
        let mut store = Self::new();
        store.effects.merge(EffectEntry::samples());
        store.transitions.merge(TransitionEntry::samples());
        store.animations.merge(AnimationEntry::samples());
        store
    }

    pub async fn load_all(&mut self, loader: &CatalogLoader) -> Vec<LoadOutcome> {
        vec![
            loader.load(&mut self.effects).await,
            loader.load(&mut self.transitions).await,
            loader.load(&mut self.animations).await,
        ]
    }
}
