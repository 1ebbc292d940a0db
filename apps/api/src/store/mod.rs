pub mod persistence;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::RwLock;
use tracing::info;

use crate::errors::AppError;
use crate::knowledge_base::integrity::ensure_integrity;
use crate::models::knowledge_base::KnowledgeBase;
use crate::store::persistence::KnowledgeBaseBackend;

/// Rule store: the current knowledge base plus the backend it is saved to.
///
/// Readers take an `Arc` snapshot and never hold the lock while working.
/// Writers hold the write lock for the whole copy → apply → persist → swap
/// sequence, so writes are serialized and a failure at any step leaves the
/// previous document in place.
pub struct KnowledgeBaseStore {
    current: RwLock<Arc<KnowledgeBase>>,
    backend: Arc<dyn KnowledgeBaseBackend>,
}

impl KnowledgeBaseStore {
    /// Loads the persisted document, or starts empty if none exists yet.
    pub async fn open(backend: Arc<dyn KnowledgeBaseBackend>) -> Result<Self> {
        let kb = backend
            .load()
            .await
            .with_context(|| format!("Failed to load knowledge base from {}", backend.describe()))?;

        let kb = match kb {
            Some(kb) => {
                ensure_integrity(&kb).with_context(|| {
                    format!("Knowledge base at {} is inconsistent", backend.describe())
                })?;
                let stats = kb.stats();
                info!(
                    "Loaded knowledge base from {}: {} questions, {} professions, {} rules",
                    backend.describe(),
                    stats.questions,
                    stats.professions,
                    stats.rules
                );
                kb
            }
            None => {
                info!(
                    "No knowledge base at {}, starting empty",
                    backend.describe()
                );
                KnowledgeBase::default()
            }
        };

        Ok(Self {
            current: RwLock::new(Arc::new(kb)),
            backend,
        })
    }

    /// Immutable view of the document as of this call.
    pub async fn snapshot(&self) -> Arc<KnowledgeBase> {
        self.current.read().await.clone()
    }

    /// Applies `change` to a copy of the document and commits it only if
    /// both the change and the save succeed.
    pub async fn mutate<T, F>(&self, change: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut KnowledgeBase) -> Result<T, AppError>,
    {
        let mut guard = self.current.write().await;
        let mut next = KnowledgeBase::clone(&**guard);
        let out = change(&mut next)?;
        self.persist(&next).await?;
        *guard = Arc::new(next);
        Ok(out)
    }

    /// Replaces the whole document after an integrity check. All-or-nothing.
    pub async fn replace(&self, kb: KnowledgeBase) -> Result<Arc<KnowledgeBase>, AppError> {
        ensure_integrity(&kb)?;
        let mut guard = self.current.write().await;
        self.persist(&kb).await?;
        let kb = Arc::new(kb);
        *guard = kb.clone();
        Ok(kb)
    }

    async fn persist(&self, kb: &KnowledgeBase) -> Result<(), AppError> {
        self.backend
            .save(kb)
            .await
            .map_err(|e| AppError::Storage(format!("{e:#}")))
    }
}
