use std::sync::Arc;

use async_trait::async_trait;
use axum::Json;
use axum::body::to_bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::Value;
use vigil_application::{IndexProvisioning, STREAMS_INDEX, StreamStore};
use vigil_core::{AppError, AppResult};
use vigil_infrastructure::InMemoryStreamStore;

use super::{enable_streams_handler, streams_status_handler};
use crate::handlers::test_support::state_with_store;

/// Delegates to an in-memory store but rejects document writes.
struct RejectingStore {
    inner: InMemoryStreamStore,
    rejection: fn() -> AppError,
}

#[async_trait]
impl StreamStore for RejectingStore {
    async fn ensure_index(&self, index: &str, mappings: &Value) -> AppResult<IndexProvisioning> {
        self.inner.ensure_index(index, mappings).await
    }

    async fn index_exists(&self, index: &str) -> AppResult<bool> {
        self.inner.index_exists(index).await
    }

    async fn get_document(&self, index: &str, id: &str) -> AppResult<Option<Value>> {
        self.inner.get_document(index, id).await
    }

    async fn put_document(&self, _index: &str, _id: &str, _document: &Value) -> AppResult<()> {
        Err((self.rejection)())
    }
}

async fn error_payload(store: RejectingStore) -> (StatusCode, Value) {
    let state = state_with_store(Arc::new(store));
    let response = enable_streams_handler(State(state))
        .await
        .map(IntoResponse::into_response)
        .unwrap_or_else(IntoResponse::into_response);

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap_or_default();
    (
        status,
        serde_json::from_slice(&bytes).unwrap_or(Value::Null),
    )
}

#[tokio::test]
async fn enable_is_idempotent() {
    let store = Arc::new(InMemoryStreamStore::new());
    let state = state_with_store(store.clone());

    for _ in 0..2 {
        let result = enable_streams_handler(State(state.clone())).await;
        assert!(matches!(result, Ok(Json(response)) if response.acknowledged));
    }

    assert_eq!(store.index_count().await, 1);
    assert_eq!(store.document_count(STREAMS_INDEX).await, 1);
    assert_eq!(store.document_writes(), 1);
}

#[tokio::test]
async fn enable_without_changes_writes_nothing() {
    let store = Arc::new(InMemoryStreamStore::new());
    let state = state_with_store(store.clone());
    assert!(enable_streams_handler(State(state.clone())).await.is_ok());
    let writes_before = store.document_writes();

    let result = enable_streams_handler(State(state)).await;

    assert!(matches!(result, Ok(Json(response)) if response.acknowledged));
    assert_eq!(store.document_writes(), writes_before);
}

#[tokio::test]
async fn security_rejection_is_a_bad_request() {
    let (status, payload) = error_payload(RejectingStore {
        inner: InMemoryStreamStore::new(),
        rejection: || {
            AppError::SecurityPolicy(
                "action [indices:data/write/index] is unauthorized for user [viewer]".to_owned(),
            )
        },
    })
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(payload["statusCode"], 400);
    assert_eq!(payload["error"], "Bad Request");
    assert!(
        payload["message"]
            .as_str()
            .is_some_and(|message| message.contains("unauthorized for user [viewer]"))
    );
}

#[tokio::test]
async fn other_failures_are_server_errors() {
    let (status, payload) = error_payload(RejectingStore {
        inner: InMemoryStreamStore::new(),
        rejection: || AppError::NotFound("index '.vigil_streams' does not exist".to_owned()),
    })
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(payload["statusCode"], 500);
    assert!(
        payload["message"]
            .as_str()
            .is_some_and(|message| message.contains(".vigil_streams"))
    );
}

#[tokio::test]
async fn status_reflects_provisioning() {
    let state = state_with_store(Arc::new(InMemoryStreamStore::new()));

    let before = streams_status_handler(State(state.clone())).await;
    assert!(matches!(before, Ok(Json(response)) if !response.enabled));

    assert!(enable_streams_handler(State(state.clone())).await.is_ok());

    let after = streams_status_handler(State(state)).await;
    assert!(matches!(after, Ok(Json(response)) if response.enabled));
}
