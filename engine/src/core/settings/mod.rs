//! Settings Persistence
//!
//! Application settings stored as JSON in `{app_data_dir}/settings.json`.
//! Loading is tolerant: missing fields take defaults and out-of-range values
//! are corrected, so a damaged file never keeps the engine from starting.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::fs::{atomic_write_json_pretty, validate_document_name};
use crate::core::{CoreError, CoreResult};

/// Settings schema version for migration support
pub const SETTINGS_VERSION: u32 = 1;

pub const SETTINGS_FILE: &str = "settings.json";

/// Advisory lock guarding concurrent writers
pub const SETTINGS_LOCK_FILE: &str = "settings.json.lock";

pub const SUPPORTED_LANGUAGES: &[&str] = &["en", "zh", "ja", "ko"];

pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

pub const MIN_FETCH_TIMEOUT_MS: u64 = 100;
pub const MAX_FETCH_TIMEOUT_MS: u64 = 60_000;

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub general: GeneralSettings,

    #[serde(default)]
    pub catalog: CatalogSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

fn default_version() -> u32 {
    SETTINGS_VERSION
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            general: GeneralSettings::default(),
            catalog: CatalogSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl AppSettings {
    /// Corrects bad values in place instead of failing.
    pub fn normalize(&mut self) {
        self.version = SETTINGS_VERSION;

        self.general.language =
            normalize_enum(&self.general.language, SUPPORTED_LANGUAGES, default_language());

        let catalog = &mut self.catalog;
        catalog.fetch_timeout_ms = catalog
            .fetch_timeout_ms
            .clamp(MIN_FETCH_TIMEOUT_MS, MAX_FETCH_TIMEOUT_MS);
        normalize_file_name(&mut catalog.draft_file, default_draft_file);
        normalize_file_name(&mut catalog.effects_file, default_effects_file);
        normalize_file_name(&mut catalog.transitions_file, default_transitions_file);
        normalize_file_name(&mut catalog.animations_file, default_animations_file);

        let mut dirs: Vec<String> = Vec::new();
        for dir in catalog.source_dirs.drain(..) {
            let dir = dir.trim().to_string();
            if !dir.is_empty() && !dirs.contains(&dir) {
                dirs.push(dir);
            }
        }
        catalog.source_dirs = dirs;

        catalog.remote_base_url = catalog
            .remote_base_url
            .take()
            .map(|url| url.trim().to_string())
            .filter(|url| url.starts_with("http://") || url.starts_with("https://"));

        self.logging.level = normalize_enum(&self.logging.level, LOG_LEVELS, default_log_level());
        if self
            .logging
            .log_dir
            .as_deref()
            .is_some_and(|d| d.trim().is_empty())
        {
            self.logging.log_dir = None;
        }
    }
}

fn normalize_enum(value: &str, allowed: &[&str], fallback: String) -> String {
    if allowed.iter().any(|v| v.eq_ignore_ascii_case(value)) {
        value.to_ascii_lowercase()
    } else {
        fallback
    }
}

fn normalize_file_name(value: &mut String, fallback: fn() -> String) {
    if let Err(e) = validate_document_name(value) {
        warn!("Resetting catalog document name: {}", e);
        *value = fallback();
    } else {
        *value = value.trim().to_string();
    }
}

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeneralSettings {
    /// UI language; picks the localized default category name
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            language: default_language(),
        }
    }
}

fn default_language() -> String {
    "en".to_string()
}

/// Where catalogs are loaded from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSettings {
    /// Directories searched before the working and app data directories
    #[serde(default)]
    pub source_dirs: Vec<String>,

    #[serde(default = "default_draft_file")]
    pub draft_file: String,

    #[serde(default = "default_effects_file")]
    pub effects_file: String,

    #[serde(default = "default_transitions_file")]
    pub transitions_file: String,

    #[serde(default = "default_animations_file")]
    pub animations_file: String,

    /// Base URL tried after local files
    #[serde(default)]
    pub remote_base_url: Option<String>,

    /// Per-document fetch timeout
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            source_dirs: Vec::new(),
            draft_file: default_draft_file(),
            effects_file: default_effects_file(),
            transitions_file: default_transitions_file(),
            animations_file: default_animations_file(),
            remote_base_url: None,
            fetch_timeout_ms: default_fetch_timeout_ms(),
        }
    }
}

fn default_draft_file() -> String {
    "draft_content.json".to_string()
}

fn default_effects_file() -> String {
    "effects.json".to_string()
}

fn default_transitions_file() -> String {
    "transitions.json".to_string()
}

fn default_animations_file() -> String {
    "animations.json".to_string()
}

fn default_fetch_timeout_ms() -> u64 {
    5_000
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoggingSettings {
    /// Default filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Also write daily-rotated log files
    #[serde(default)]
    pub file_logging: bool,

    /// Log file directory; `{app_data_dir}/logs` when unset
    #[serde(default)]
    pub log_dir: Option<String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_logging: false,
            log_dir: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

// =============================================================================
// Settings Manager
// =============================================================================

/// Loads, saves and resets the settings file
pub struct SettingsManager {
    settings_path: PathBuf,
}

impl SettingsManager {
    pub fn new(app_data_dir: impl AsRef<Path>) -> Self {
        Self {
            settings_path: app_data_dir.as_ref().join(SETTINGS_FILE),
        }
    }

    fn lock_path(&self) -> PathBuf {
        self.settings_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(SETTINGS_LOCK_FILE)
    }

    fn with_lock<T>(&self, exclusive: bool, op: impl FnOnce() -> CoreResult<T>) -> CoreResult<T> {
        if let Some(parent) = self.settings_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let lock_file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(self.lock_path())
            .map_err(|e| CoreError::Settings(format!("Failed to open settings lock: {}", e)))?;

        let locked = if exclusive {
            fs2::FileExt::lock_exclusive(&lock_file)
        } else {
            fs2::FileExt::lock_shared(&lock_file)
        };
        locked.map_err(|e| CoreError::Settings(format!("Failed to lock settings: {}", e)))?;

        let result = op();

        if let Err(e) = fs2::FileExt::unlock(&lock_file) {
            warn!("Failed to unlock settings lock file: {}", e);
        }
        result
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    /// Loads settings, falling back to defaults when the file is missing or unreadable.
    pub fn load(&self) -> AppSettings {
        let result = self.with_lock(false, || {
            if !self.settings_path.exists() {
                info!("Settings file not found, using defaults");
                return Ok(AppSettings::default());
            }

            let content = fs::read_to_string(&self.settings_path)?;
            let mut settings: AppSettings = serde_json::from_str(&content)
                .map_err(|e| CoreError::Settings(format!("Failed to parse settings: {}", e)))?;

            if settings.version < SETTINGS_VERSION {
                info!(
                    "Migrating settings from version {} to {}",
                    settings.version, SETTINGS_VERSION
                );
                settings = migrate(settings);
            }

            settings.normalize();
            Ok(settings)
        });

        result.unwrap_or_else(|e| {
            warn!("Failed to load settings, using defaults: {}", e);
            AppSettings::default()
        })
    }

    /// Normalizes and persists settings, returning what was written.
    pub fn save(&self, settings: &AppSettings) -> CoreResult<AppSettings> {
        self.with_lock(true, || {
            let mut normalized = settings.clone();
            normalized.normalize();
            atomic_write_json_pretty(&self.settings_path, &normalized)?;
            info!("Settings saved to {}", self.settings_path.display());
            Ok(normalized)
        })
    }

    /// Deletes the settings file and returns defaults.
    pub fn reset(&self) -> CoreResult<AppSettings> {
        self.with_lock(true, || {
            if self.settings_path.exists() {
                fs::remove_file(&self.settings_path)?;
                info!("Settings file deleted");
            }
            Ok(AppSettings::default())
        })
    }
}

/// Files written before versioning carried `version: 0` and only the language.
fn migrate(mut settings: AppSettings) -> AppSettings {
    settings.version = SETTINGS_VERSION;
    settings
}
