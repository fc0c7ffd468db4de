use async_trait::async_trait;
use serde_json::Value;
use vigil_core::AppResult;

/// Result of an index provisioning request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexProvisioning {
    /// The index did not exist and was created.
    Created,
    /// The index was already present.
    AlreadyExists,
}

/// Document store backing stream definitions.
#[async_trait]
pub trait StreamStore: Send + Sync {
    /// Creates `index` with `mappings` unless it already exists.
    async fn ensure_index(&self, index: &str, mappings: &Value) -> AppResult<IndexProvisioning>;

    /// Returns whether `index` exists.
    async fn index_exists(&self, index: &str) -> AppResult<bool>;

    /// Returns the source of a stored document.
    async fn get_document(&self, index: &str, id: &str) -> AppResult<Option<Value>>;

    /// Creates or replaces a document.
    async fn put_document(&self, index: &str, id: &str, document: &Value) -> AppResult<()>;
}
