//! capdraft Error Definitions
//!
//! Defines error types used throughout the project.

use thiserror::Error;

use super::MaterialId;

/// Core engine error types
#[derive(Error, Debug)]
pub enum CoreError {
    // =========================================================================
    // Document Errors
    // =========================================================================
    #[error("Malformed draft document: {0}")]
    MalformedDocument(String),

    #[error("Invalid descriptor: {0}")]
    InvalidDescriptor(String),

    #[error("Material not found: {0}")]
    MaterialNotFound(MaterialId),

    // =========================================================================
    // Catalog Errors
    // =========================================================================
    #[error("Catalog load already in progress: {0}")]
    LoadInProgress(String),

    #[error("Catalog entry not found: {0}")]
    EntryNotFound(String),

    // =========================================================================
    // Source Errors
    // =========================================================================
    #[error("Source document not found: {0}")]
    SourceNotFound(String),

    #[error("Source fetch failed: {0}")]
    SourceFetchFailed(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    // =========================================================================
    // Settings Errors
    // =========================================================================
    #[error("Settings error: {0}")]
    Settings(String),

    // =========================================================================
    // General Errors
    // =========================================================================
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Core engine result type
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Convert to a user-friendly error message for IPC
    pub fn to_ipc_error(&self) -> String {
        self.to_string()
    }

    /// Whether a catalog loader should move on to its next source after this error
    pub fn is_fallback_trigger(&self) -> bool {
        matches!(
            self,
            Self::SourceNotFound(_)
                | Self::SourceFetchFailed(_)
                | Self::Timeout(_)
                | Self::IoError(_)
                | Self::JsonError(_)
                | Self::MalformedDocument(_)
        )
    }
}
