use std::sync::Arc;

use serde_json::{Value, json};
use tracing::info;
use vigil_core::{AppError, AppResult};
use vigil_domain::{ROOT_STREAM_ID, StreamDefinition};

use crate::streams_ports::{IndexProvisioning, StreamStore};

/// Name of the index holding stream definition documents.
pub const STREAMS_INDEX: &str = ".vigil_streams";

/// What a provisioning call changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnableStreamsOutcome {
    /// Whether the streams index had to be created.
    pub index_created: bool,
    /// Whether the root stream document was written.
    pub root_stream_written: bool,
}

/// Current provisioning state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamsStatus {
    /// True once the index and the root stream document both exist.
    pub enabled: bool,
}

/// Application service for the streams feature.
#[derive(Clone)]
pub struct StreamsService {
    store: Arc<dyn StreamStore>,
}

impl StreamsService {
    /// Creates a new service from a stream store implementation.
    #[must_use]
    pub fn new(store: Arc<dyn StreamStore>) -> Self {
        Self { store }
    }

    /// Provisions the streams index and synchronizes the root stream.
    ///
    /// Safe to repeat. The first failing step aborts the call and nothing
    /// already written is rolled back.
    pub async fn enable(&self) -> AppResult<EnableStreamsOutcome> {
        let provisioning = self
            .store
            .ensure_index(STREAMS_INDEX, &streams_index_mappings())
            .await?;
        let root_stream_written = self.sync_stream(&StreamDefinition::root()).await?;

        let outcome = EnableStreamsOutcome {
            index_created: provisioning == IndexProvisioning::Created,
            root_stream_written,
        };

        info!(
            index = STREAMS_INDEX,
            index_created = outcome.index_created,
            root_stream_written = outcome.root_stream_written,
            "streams enabled"
        );

        Ok(outcome)
    }

    /// Writes `definition` unless the stored document is already identical.
    ///
    /// Returns whether a write happened.
    pub async fn sync_stream(&self, definition: &StreamDefinition) -> AppResult<bool> {
        let document = serde_json::to_value(definition).map_err(|error| {
            AppError::Internal(format!(
                "failed to serialize stream '{}': {error}",
                definition.id()
            ))
        })?;

        let stored = self
            .store
            .get_document(STREAMS_INDEX, definition.id())
            .await?;
        if stored.as_ref() == Some(&document) {
            return Ok(false);
        }

        self.store
            .put_document(STREAMS_INDEX, definition.id(), &document)
            .await?;
        Ok(true)
    }

    /// Reports whether streams have been provisioned.
    pub async fn status(&self) -> AppResult<StreamsStatus> {
        if !self.store.index_exists(STREAMS_INDEX).await? {
            return Ok(StreamsStatus { enabled: false });
        }

        let root = self
            .store
            .get_document(STREAMS_INDEX, ROOT_STREAM_ID)
            .await?;
        Ok(StreamsStatus {
            enabled: root.is_some(),
        })
    }
}

fn streams_index_mappings() -> Value {
    json!({
        "dynamic": "strict",
        "properties": {
            "id": { "type": "keyword" },
            "children": { "type": "object", "enabled": false },
            "fields": { "type": "object", "enabled": false }
        }
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use async_trait::async_trait;
    use serde_json::{Value, json};
    use tokio::sync::Mutex;
    use vigil_core::{AppError, AppResult};
    use vigil_domain::{ROOT_STREAM_ID, StreamDefinition};

    use crate::{IndexProvisioning, StreamStore};

    use super::{STREAMS_INDEX, StreamsService};

    #[derive(Default)]
    struct FakeStore {
        indices: Mutex<HashMap<String, Value>>,
        documents: Mutex<HashMap<(String, String), Value>>,
        writes: Mutex<usize>,
        deny_writes: bool,
        fail_index: bool,
    }

    #[async_trait]
    impl StreamStore for FakeStore {
        async fn ensure_index(
            &self,
            index: &str,
            mappings: &Value,
        ) -> AppResult<IndexProvisioning> {
            if self.fail_index {
                return Err(AppError::Internal("store unavailable".to_owned()));
            }

            let mut indices = self.indices.lock().await;
            if indices.contains_key(index) {
                return Ok(IndexProvisioning::AlreadyExists);
            }
            indices.insert(index.to_owned(), mappings.clone());
            Ok(IndexProvisioning::Created)
        }

        async fn index_exists(&self, index: &str) -> AppResult<bool> {
            Ok(self.indices.lock().await.contains_key(index))
        }

        async fn get_document(&self, index: &str, id: &str) -> AppResult<Option<Value>> {
            Ok(self
                .documents
                .lock()
                .await
                .get(&(index.to_owned(), id.to_owned()))
                .cloned())
        }

        async fn put_document(&self, index: &str, id: &str, document: &Value) -> AppResult<()> {
            if self.deny_writes {
                return Err(AppError::SecurityPolicy(
                    "action [indices:data/write/index] is unauthorized".to_owned(),
                ));
            }

            *self.writes.lock().await += 1;
            self.documents
                .lock()
                .await
                .insert((index.to_owned(), id.to_owned()), document.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn enable_creates_index_and_root_stream_once() {
        let store = Arc::new(FakeStore::default());
        let service = StreamsService::new(store.clone());

        let first = service.enable().await;
        assert!(first.is_ok());
        let first = first.unwrap_or_else(|_| unreachable!());
        assert!(first.index_created);
        assert!(first.root_stream_written);

        let second = service.enable().await;
        assert!(second.is_ok());
        let second = second.unwrap_or_else(|_| unreachable!());
        assert!(!second.index_created);
        assert!(!second.root_stream_written);

        assert_eq!(store.indices.lock().await.len(), 1);
        assert_eq!(store.documents.lock().await.len(), 1);
        assert_eq!(*store.writes.lock().await, 1);
    }

    #[tokio::test]
    async fn enable_rewrites_a_stale_root_document() {
        let store = Arc::new(FakeStore::default());
        store.documents.lock().await.insert(
            (STREAMS_INDEX.to_owned(), ROOT_STREAM_ID.to_owned()),
            json!({ "id": ROOT_STREAM_ID, "children": [], "fields": [] }),
        );
        let service = StreamsService::new(store.clone());

        let outcome = service.enable().await;
        assert!(outcome.is_ok_and(|outcome| outcome.root_stream_written));

        let expected = serde_json::to_value(StreamDefinition::root()).unwrap_or_default();
        let stored = store
            .documents
            .lock()
            .await
            .get(&(STREAMS_INDEX.to_owned(), ROOT_STREAM_ID.to_owned()))
            .cloned();
        assert_eq!(stored, Some(expected));
    }

    #[tokio::test]
    async fn security_errors_propagate_and_keep_the_created_index() {
        let store = Arc::new(FakeStore {
            deny_writes: true,
            ..FakeStore::default()
        });
        let service = StreamsService::new(store.clone());

        let result = service.enable().await;
        assert!(matches!(result, Err(AppError::SecurityPolicy(_))));
        assert!(store.indices.lock().await.contains_key(STREAMS_INDEX));
    }

    #[tokio::test]
    async fn index_failure_stops_before_sync() {
        let store = Arc::new(FakeStore {
            fail_index: true,
            ..FakeStore::default()
        });
        let service = StreamsService::new(store.clone());

        assert!(matches!(service.enable().await, Err(AppError::Internal(_))));
        assert_eq!(*store.writes.lock().await, 0);
    }

    #[tokio::test]
    async fn status_reflects_provisioning() {
        let store = Arc::new(FakeStore::default());
        let service = StreamsService::new(store);

        assert!(matches!(service.status().await, Ok(status) if !status.enabled));
        assert!(service.enable().await.is_ok());
        assert!(matches!(service.status().await, Ok(status) if status.enabled));
    }
}
