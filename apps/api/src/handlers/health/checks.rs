use vigil_application::StreamsService;

use super::*;

pub(super) async fn check_postgres(pool: Option<sqlx::PgPool>) -> HealthDependencyStatus {
    let Some(pool) = pool else {
        return HealthDependencyStatus {
            status: "in_memory",
            detail: None,
        };
    };

    let check = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&pool)
        .await;

    match check {
        Ok(_) => HealthDependencyStatus {
            status: "ok",
            detail: None,
        },
        Err(error) => HealthDependencyStatus {
            status: "error",
            detail: Some(format!("postgres check failed: {error}")),
        },
    }
}

pub(super) async fn check_stream_store(streams_service: &StreamsService) -> HealthDependencyStatus {
    match streams_service.status().await {
        Ok(_) => HealthDependencyStatus {
            status: "ok",
            detail: None,
        },
        Err(error) => HealthDependencyStatus {
            status: "error",
            detail: Some(format!("stream store check failed: {error}")),
        },
    }
}
