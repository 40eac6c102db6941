//! Document Sources
//!
//! Where catalog documents come from. The loader walks its sources in order
//! and stops at the first one that yields entries.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::core::fs::resolve_candidate;
use crate::core::{CoreError, CoreResult};

/// Fetches named JSON documents
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Short human-readable origin used in logs and load reports
    fn describe(&self) -> String;

    /// Fetches and parses the document called `name`.
    ///
    /// Returns [`CoreError::SourceNotFound`] when the source has no such document.
    async fn fetch(&self, name: &str) -> CoreResult<Value>;
}

// =============================================================================
// File Source
// =============================================================================

/// Reads documents from the first candidate directory that has them
#[derive(Clone, Debug)]
pub struct FileSource {
    candidate_dirs: Vec<PathBuf>,
}

impl FileSource {
    pub fn new(candidate_dirs: Vec<PathBuf>) -> Self {
        Self { candidate_dirs }
    }

    pub fn candidate_dirs(&self) -> &[PathBuf] {
        &self.candidate_dirs
    }

    /// Path `name` resolves to, if any candidate has it
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        resolve_candidate(&self.candidate_dirs, Path::new(name))
    }
}

#[async_trait]
impl DocumentSource for FileSource {
    fn describe(&self) -> String {
        format!("files({} dirs)", self.candidate_dirs.len())
    }

    async fn fetch(&self, name: &str) -> CoreResult<Value> {
        let path = self
            .resolve(name)
            .ok_or_else(|| CoreError::SourceNotFound(name.to_string()))?;
        let bytes = tokio::fs::read(&path).await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            CoreError::MalformedDocument(format!("{}: {}", path.display(), e))
        })
    }
}

// =============================================================================
// Memory Source
// =============================================================================

/// Serves documents held in memory, such as ones bundled with the binary
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    label: String,
    documents: HashMap<String, Value>,
    delay: Option<Duration>,
}

impl MemorySource {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn with_document(mut self, name: impl Into<String>, doc: Value) -> Self {
        self.documents.insert(name.into(), doc);
        self
    }

    /// Delays every fetch; used to exercise loader timeouts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl DocumentSource for MemorySource {
    fn describe(&self) -> String {
        format!("memory({})", self.label)
    }

    async fn fetch(&self, name: &str) -> CoreResult<Value> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.documents
            .get(name)
            .cloned()
            .ok_or_else(|| CoreError::SourceNotFound(name.to_string()))
    }
}

// =============================================================================
// HTTP Source
// =============================================================================

/// Fetches documents relative to a base URL
#[cfg(feature = "remote-sources")]
pub struct HttpSource {
    base_url: String,
    client: reqwest::Client,
}

#[cfg(feature = "remote-sources")]
impl HttpSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> CoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    fn url_for(&self, name: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            name.trim_start_matches('/')
        )
    }
}

#[cfg(feature = "remote-sources")]
#[async_trait]
impl DocumentSource for HttpSource {
    fn describe(&self) -> String {
        format!("http({})", self.base_url)
    }

    async fn fetch(&self, name: &str) -> CoreResult<Value> {
        let url = self.url_for(name);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CoreError::SourceFetchFailed(format!("{}: {}", url, e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CoreError::SourceNotFound(url));
        }
        if !status.is_success() {
            return Err(CoreError::SourceFetchFailed(format!("{}: HTTP {}", url, status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| CoreError::SourceFetchFailed(format!("{}: {}", url, e)))?;

        serde_json::from_str(&body)
            .map_err(|e| CoreError::MalformedDocument(format!("{}: {}", url, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_file_source_uses_first_matching_dir() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        std::fs::write(second.path().join("effects.json"), r#"[{"id":"A","name":"X"}]"#).unwrap();

        let source = FileSource::new(vec![first.path().to_path_buf(), second.path().to_path_buf()]);
        let doc = source.fetch("effects.json").await.unwrap();
        assert_eq!(doc[0]["id"], "A");
    }

    #[tokio::test]
    async fn test_file_source_missing_document() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSource::new(vec![dir.path().to_path_buf()]);
        let err = source.fetch("nope.json").await.unwrap_err();
        assert!(matches!(err, CoreError::SourceNotFound(_)));
    }

    #[tokio::test]
    async fn test_file_source_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.json"), "{ not json").unwrap();
        let source = FileSource::new(vec![dir.path().to_path_buf()]);
        let err = source.fetch("bad.json").await.unwrap_err();
        assert!(matches!(err, CoreError::MalformedDocument(_)));
    }

    #[tokio::test]
    async fn test_memory_source() {
        let source = MemorySource::new("bundled").with_document("a.json", json!({"k": 1}));
        assert_eq!(source.fetch("a.json").await.unwrap()["k"], 1);
        assert!(source.fetch("b.json").await.is_err());
        assert_eq!(source.describe(), "memory(bundled)");
    }

    #[cfg(feature = "remote-sources")]
    #[test]
    fn test_http_url_join() {
        let source = HttpSource::new("https://cdn.example.com/catalogs/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            source.url_for("/effects.json"),
            "https://cdn.example.com/catalogs/effects.json"
        );
    }
}
