//! Filesystem helpers.
//!
//! Draft documents and settings are rewritten in place while the editor may
//! have them open, so every write goes through a temp file and a rename. A
//! crash mid-write leaves either the old or the new document, never half of one.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::core::{CoreError, CoreResult};

// =============================================================================
// Path Validation
// =============================================================================

/// Checks that a document name is a plain relative file name.
///
/// Catalog documents are looked up by name across several directories, so a
/// name must not be able to climb out of them.
pub fn validate_document_name(name: &str) -> Result<(), String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("document name is empty".to_string());
    }
    if trimmed.contains("..") || trimmed.contains('/') || trimmed.contains('\\') || trimmed.contains(':') {
        return Err(format!("invalid document name '{trimmed}': must be a bare file name"));
    }
    if trimmed.chars().any(|c| c.is_control()) {
        return Err(format!("invalid document name '{trimmed}': contains control characters"));
    }
    Ok(())
}

/// Validates a path to an existing local draft file.
pub fn validate_draft_path(path: &str, label: &str) -> Result<PathBuf, String> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return Err(format!("{label} is empty"));
    }
    if trimmed.contains("://") {
        return Err(format!("{label} must be a local file path"));
    }

    let pb = PathBuf::from(trimmed);
    let meta = std::fs::metadata(&pb).map_err(|_| format!("{label} not found: {}", pb.display()))?;
    if !meta.is_file() {
        return Err(format!("{label} is not a file: {}", pb.display()));
    }
    Ok(pb)
}

/// Validates a destination path, creating its parent directory if needed.
pub fn validate_output_path(path: &str, label: &str) -> Result<PathBuf, String> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return Err(format!("{label} is empty"));
    }

    let pb = PathBuf::from(trimmed);
    if pb.is_dir() {
        return Err(format!("{label} points to a directory: {}", pb.display()));
    }
    if let Some(parent) = pb.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create directory for {label}: {e}"))?;
    }
    Ok(pb)
}

// =============================================================================
// Lookup
// =============================================================================

/// Finds `name` in the first of `dirs` that contains it.
///
/// Absolute names are returned as-is when the file exists.
pub fn resolve_candidate(dirs: &[PathBuf], name: &Path) -> Option<PathBuf> {
    if name.is_absolute() {
        return name.is_file().then(|| name.to_path_buf());
    }
    dirs.iter().map(|dir| dir.join(name)).find(|p| p.is_file())
}

/// Directories searched for catalog documents after the configured ones:
/// the working directory, then `catalogs/` under the app data directory.
pub fn default_catalog_dirs(app_data_dir: Option<&Path>) -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }
    if let Some(data) = app_data_dir {
        dirs.push(data.join("catalogs"));
    }
    dirs
}

// =============================================================================
// Reading and Writing
// =============================================================================

/// Reads and parses a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> CoreResult<T> {
    let bytes = std::fs::read(path)?;
    serde_json::from_slice(&bytes)
        .map_err(|e| CoreError::MalformedDocument(format!("{}: {}", path.display(), e)))
}

/// Writes bytes to `path` through a sibling temp file and a rename.
///
/// An existing destination is moved aside to `.bak` for the swap and
/// restored if the final rename fails.
pub fn atomic_write_bytes(path: &Path, bytes: &[u8]) -> CoreResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let tmp = sibling(path, "tmp");
    {
        let mut writer = BufWriter::new(File::create(&tmp)?);
        writer.write_all(bytes)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
    }

    replace(path, &tmp)
}

/// Pretty-prints `value` as JSON and writes it atomically.
pub fn atomic_write_json_pretty<T: serde::Serialize>(path: &Path, value: &T) -> CoreResult<()> {
    let bytes = serde_json::to_vec_pretty(value)?;
    atomic_write_bytes(path, &bytes)
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    path.with_file_name(format!("{file_name}.{suffix}"))
}

fn replace(dest: &Path, tmp: &Path) -> CoreResult<()> {
    if !dest.exists() {
        std::fs::rename(tmp, dest)?;
        return Ok(());
    }

    let bak = sibling(dest, "bak");
    if bak.exists() {
        let _ = std::fs::remove_file(&bak);
    }

    std::fs::rename(dest, &bak)?;
    match std::fs::rename(tmp, dest) {
        Ok(()) => {
            let _ = std::fs::remove_file(&bak);
            Ok(())
        }
        Err(e) => {
            let _ = std::fs::rename(&bak, dest);
            let _ = std::fs::remove_file(tmp);
            Err(CoreError::IoError(e))
        }
    }
}
