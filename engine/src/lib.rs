//! CapDraft Library
//!
//! Edits CapCut draft documents: applies video effects, transitions and clip
//! animations picked from catalogs, and keeps the draft's required material
//! references in place. The [`ipc`] facade is what a desktop shell or the CLI
//! calls; the engine itself lives under [`core`].

pub mod core;
pub mod ipc;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

use tokio::sync::Mutex;
use tracing::warn;

use crate::core::catalog::{CatalogLoader, CatalogStore, LoadOutcome};
use crate::core::draft::EntityFactory;
use crate::core::fs::default_catalog_dirs;
use crate::core::settings::{AppSettings, LoggingSettings, SettingsManager};
use crate::core::{CoreError, CoreResult};

/// Directory name under the platform data dir
pub const APP_DIR_NAME: &str = "capdraft";

// =============================================================================
// Application State
// =============================================================================

/// State shared by every IPC command
pub struct AppState {
    app_data_dir: PathBuf,
    settings: SettingsManager,
    /// Catalogs offered to the user
    pub catalogs: Mutex<CatalogStore>,
    loading: AtomicBool,
}

/// Clears the loading flag when a reload ends, however it ends.
struct LoadingGuard<'a>(&'a AtomicBool);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl AppState {
    /// Creates state rooted at `app_data_dir`, with sentinel-only catalogs.
    pub fn new(app_data_dir: impl Into<PathBuf>) -> Self {
        let app_data_dir = app_data_dir.into();
        Self {
            settings: SettingsManager::new(&app_data_dir),
            app_data_dir,
            catalogs: Mutex::new(CatalogStore::new()),
            loading: AtomicBool::new(false),
        }
    }

    /// Platform data directory for the app, when the platform has one.
    pub fn default_app_data_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join(APP_DIR_NAME))
    }

    pub fn app_data_dir(&self) -> &Path {
        &self.app_data_dir
    }

    pub fn settings(&self) -> &SettingsManager {
        &self.settings
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Entity factory configured for the current UI language
    pub fn factory(&self) -> EntityFactory {
        EntityFactory::for_language(&self.settings.load().general.language)
    }

    /// Loader built from the current settings
    pub fn loader(&self) -> CoreResult<CatalogLoader> {
        let settings = self.settings.load();
        CatalogLoader::from_settings(&settings.catalog, default_catalog_dirs(Some(&self.app_data_dir)))
    }

    /// Reloads all catalogs from their sources.
    ///
    /// Readers keep seeing the previous catalogs until the reload finishes.
    /// A second reload while one is running fails with [`CoreError::LoadInProgress`].
    pub async fn reload_catalogs(&self) -> CoreResult<Vec<LoadOutcome>> {
        if self.loading.swap(true, Ordering::SeqCst) {
            return Err(CoreError::LoadInProgress(
                "catalogs are already being loaded".to_string(),
            ));
        }
        let _guard = LoadingGuard(&self.loading);

        let loader = self.loader()?;
        let mut store = self.catalogs.lock().await.clone();
        let outcomes = store.load_all(&loader).await;
        *self.catalogs.lock().await = store;
        Ok(outcomes)
    }
}

// =============================================================================
// Logging
// =============================================================================

static LOG_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

/// Installs the global subscriber: stderr always, daily files when enabled.
///
/// `RUST_LOG` overrides the configured level. Calling this twice is harmless.
pub fn init_logging(settings: &LoggingSettings, app_data_dir: &Path) {
    use tracing_subscriber::prelude::*;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.level));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(cfg!(debug_assertions));

    let mut file_error = None;
    let file_layer = if settings.file_logging {
        let log_dir = settings
            .log_dir
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(|| app_data_dir.join("logs"));

        match tracing_appender::rolling::RollingFileAppender::builder()
            .rotation(tracing_appender::rolling::Rotation::DAILY)
            .filename_prefix(APP_DIR_NAME)
            .filename_suffix("log")
            .build(&log_dir)
        {
            Ok(appender) => {
                let (non_blocking, guard) = tracing_appender::non_blocking(appender);
                let _ = LOG_GUARD.set(guard);
                Some(
                    tracing_subscriber::fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(false),
                )
            }
            Err(e) => {
                file_error = Some(format!("{}: {}", log_dir.display(), e));
                None
            }
        }
    } else {
        None
    };

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer);
    let _ = tracing::subscriber::set_global_default(subscriber);

    if let Some(e) = file_error {
        warn!("File logging disabled: {}", e);
    }
}

/// Loads settings from `app_data_dir` and initializes logging from them.
pub fn init_logging_from(app_data_dir: &Path) -> AppSettings {
    let settings = SettingsManager::new(app_data_dir).load();
    init_logging(&settings.logging, app_data_dir);
    settings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_reload_without_sources_uses_samples() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = AppSettings::default();
        settings.catalog.draft_file = "absent_draft.json".into();
        settings.catalog.effects_file = "absent_effects.json".into();
        settings.catalog.transitions_file = "absent_transitions.json".into();
        settings.catalog.animations_file = "absent_animations.json".into();
        let state = AppState::new(dir.path());
        state.settings().save(&settings).unwrap();

        let outcomes = state.reload_catalogs().await.unwrap();
        assert_eq!(outcomes.len(), 3);
        assert!(!state.is_loading());
        assert!(state.catalogs.lock().await.effects.len() > 1);
    }

    #[tokio::test]
    async fn test_concurrent_reload_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let state = Arc::new(AppState::new(dir.path()));
        state.loading.store(true, Ordering::SeqCst);

        let err = state.reload_catalogs().await.unwrap_err();
        assert!(matches!(err, CoreError::LoadInProgress(_)));
        // the rejected call must not clear the running load's flag
        assert!(state.is_loading());
    }

    #[test]
    fn test_factory_follows_language() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(dir.path());
        let mut settings = AppSettings::default();
        settings.general.language = "ja".into();
        state.settings().save(&settings).unwrap();
        assert_eq!(state.factory().category_name(), "トレンド");
    }
}
