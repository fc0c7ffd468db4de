use super::checks::{check_postgres, check_stream_store};
use super::*;

pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let repository = check_postgres(state.postgres_pool.clone()).await;
    let stream_store = check_stream_store(&state.streams_service).await;

    let ready = !is_failed(repository.status) && !is_failed(stream_store.status);
    let status = if ready { "ok" } else { "degraded" };
    let http_status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        http_status,
        Json(HealthResponse {
            status,
            ready,
            repository,
            stream_store,
        }),
    )
}

fn is_failed(status: &str) -> bool {
    status == "error"
}

#[cfg(test)]
mod tests {
    use axum::extract::State;
    use axum::http::StatusCode;

    use super::health_handler;
    use crate::handlers::test_support::in_memory_state;

    #[tokio::test]
    async fn in_memory_adapters_are_ready() {
        let (status, payload) = health_handler(State(in_memory_state())).await;

        assert_eq!(status, StatusCode::OK);
        assert!(payload.ready);
        assert_eq!(payload.status, "ok");
        assert_eq!(payload.repository.status, "in_memory");
        assert_eq!(payload.stream_store.status, "ok");
    }
}
