use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use vigil_application::{IndexProvisioning, StreamStore};
use vigil_core::{AppError, AppResult};

/// In-memory stream store implementation.
#[derive(Debug, Default)]
pub struct InMemoryStreamStore {
    indices: RwLock<HashMap<String, Value>>,
    documents: RwLock<HashMap<(String, String), Value>>,
    document_writes: AtomicU64,
}

impl InMemoryStreamStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of indices created so far.
    pub async fn index_count(&self) -> usize {
        self.indices.read().await.len()
    }

    /// Number of documents stored in `index`.
    pub async fn document_count(&self, index: &str) -> usize {
        self.documents
            .read()
            .await
            .keys()
            .filter(|(stored_index, _)| stored_index == index)
            .count()
    }

    /// Number of successful document writes so far.
    #[must_use]
    pub fn document_writes(&self) -> u64 {
        self.document_writes.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl StreamStore for InMemoryStreamStore {
    async fn ensure_index(&self, index: &str, mappings: &Value) -> AppResult<IndexProvisioning> {
        let mut indices = self.indices.write().await;
        if indices.contains_key(index) {
            return Ok(IndexProvisioning::AlreadyExists);
        }

        indices.insert(index.to_owned(), mappings.clone());
        Ok(IndexProvisioning::Created)
    }

    async fn index_exists(&self, index: &str) -> AppResult<bool> {
        Ok(self.indices.read().await.contains_key(index))
    }

    async fn get_document(&self, index: &str, id: &str) -> AppResult<Option<Value>> {
        Ok(self
            .documents
            .read()
            .await
            .get(&(index.to_owned(), id.to_owned()))
            .cloned())
    }

    async fn put_document(&self, index: &str, id: &str, document: &Value) -> AppResult<()> {
        if !self.indices.read().await.contains_key(index) {
            return Err(AppError::NotFound(format!("index '{index}' does not exist")));
        }

        let mut documents = self.documents.write().await;
        documents.insert((index.to_owned(), id.to_owned()), document.clone());
        self.document_writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
