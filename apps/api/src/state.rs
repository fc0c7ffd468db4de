use sqlx::PgPool;
use vigil_application::{AnonymizationFieldService, StreamsService};
use vigil_core::Namespace;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub anonymization_field_service: AnonymizationFieldService,
    pub streams_service: StreamsService,
    pub default_namespace: Namespace,
    pub postgres_pool: Option<PgPool>,
}
