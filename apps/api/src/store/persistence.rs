//! Persistence backends for the knowledge-base document.
//!
//! `KnowledgeBaseStore` holds an `Arc<dyn KnowledgeBaseBackend>`; production
//! uses `JsonFileBackend`, tests use `MemoryBackend`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use crate::models::knowledge_base::KnowledgeBase;

#[async_trait]
pub trait KnowledgeBaseBackend: Send + Sync {
    /// `Ok(None)` when nothing has been persisted yet.
    async fn load(&self) -> Result<Option<KnowledgeBase>>;

    async fn save(&self, kb: &KnowledgeBase) -> Result<()>;

    /// Human-readable location, for logs.
    fn describe(&self) -> String;
}

// ────────────────────────────────────────────────────────────────────────────
// JsonFileBackend
// ────────────────────────────────────────────────────────────────────────────

/// Stores the document as pretty-printed JSON at `path`.
///
/// Writes go to a sibling `.tmp` file which is then renamed over the target,
/// so readers never observe a half-written document.
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "knowledge_base.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl KnowledgeBaseBackend for JsonFileBackend {
    async fn load(&self) -> Result<Option<KnowledgeBase>> {
        if !tokio::fs::try_exists(&self.path)
            .await
            .with_context(|| format!("Cannot access {}", self.path.display()))?
        {
            return Ok(None);
        }

        let raw = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let kb = serde_json::from_slice(&raw)
            .with_context(|| format!("{} is not a valid knowledge base", self.path.display()))?;
        Ok(Some(kb))
    }

    async fn save(&self, kb: &KnowledgeBase) -> Result<()> {
        let body = serde_json::to_vec_pretty(kb).context("Failed to serialize knowledge base")?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            ensure_dir(parent).await?;
        }

        let tmp = self.temp_path();
        tokio::fs::write(&tmp, &body)
            .await
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;

        debug!("Saved knowledge base ({} bytes) to {}", body.len(), self.path.display());
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

async fn ensure_dir(dir: &Path) -> Result<()> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create {}", dir.display()))
}

// ────────────────────────────────────────────────────────────────────────────
// MemoryBackend (tests)
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub use memory::MemoryBackend;


#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::Profession;

    fn sample() -> KnowledgeBase {
        KnowledgeBase {
            professions: vec![Profession {
                id: "dev".into(),
                name: "Разработчик".into(),
                description: "Пишет код".into(),
            }],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_missing_file_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("kb.json"));
        assert!(backend.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load_preserves_document() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("nested").join("kb.json"));
        backend.save(&sample()).await.unwrap();

        assert_eq!(backend.load().await.unwrap(), Some(sample()));
        assert!(!dir.path().join("nested").join("kb.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kb.json");
        std::fs::write(&path, b"{ not json").unwrap();
        let err = JsonFileBackend::new(&path).load().await.unwrap_err();
        assert!(err.to_string().contains("not a valid knowledge base"));
    }
}
