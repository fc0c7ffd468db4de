use std::sync::Arc;

use sqlx::PgPool;
use tracing::info;
use vigil_application::{
    AnonymizationFieldRepository, AnonymizationFieldService, StreamStore, StreamsService,
};
use vigil_core::AppError;
use vigil_infrastructure::{
    ElasticsearchCredentials, ElasticsearchStreamStore, InMemoryAnonymizationFieldRepository,
    InMemoryStreamStore, PostgresAnonymizationFieldRepository,
};

use crate::api_config::{ApiConfig, ElasticsearchConfig};
use crate::state::AppState;

pub fn build_app_state(config: &ApiConfig, pool: Option<PgPool>) -> Result<AppState, AppError> {
    let repository: Arc<dyn AnonymizationFieldRepository> = match &pool {
        Some(pool) => {
            info!("using postgres anonymization field repository");
            Arc::new(PostgresAnonymizationFieldRepository::new(pool.clone()))
        }
        None => {
            info!("DATABASE_URL not set, anonymization fields are kept in memory");
            Arc::new(InMemoryAnonymizationFieldRepository::new())
        }
    };

    let stream_store: Arc<dyn StreamStore> = match &config.elasticsearch {
        Some(elasticsearch) => {
            info!(url = %elasticsearch.url, "using elasticsearch stream store");
            Arc::new(build_elasticsearch_store(elasticsearch)?)
        }
        None => {
            info!("ELASTICSEARCH_URL not set, streams are kept in memory");
            Arc::new(InMemoryStreamStore::new())
        }
    };

    Ok(AppState {
        anonymization_field_service: AnonymizationFieldService::new(
            repository,
            config.bulk_action_max_items,
        ),
        streams_service: StreamsService::new(stream_store),
        default_namespace: config.default_namespace.clone(),
        postgres_pool: pool,
    })
}

fn build_elasticsearch_store(
    config: &ElasticsearchConfig,
) -> Result<ElasticsearchStreamStore, AppError> {
    let http_client = reqwest::Client::builder()
        .timeout(config.timeout)
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build http client: {error}")))?;

    let credentials = match (&config.username, &config.password) {
        (Some(username), password) => Some(ElasticsearchCredentials {
            username: username.clone(),
            password: password.clone().unwrap_or_default(),
        }),
        (None, Some(_)) => {
            return Err(AppError::Validation(
                "ELASTICSEARCH_PASSWORD requires ELASTICSEARCH_USERNAME".to_owned(),
            ));
        }
        (None, None) => None,
    };

    Ok(ElasticsearchStreamStore::new(
        http_client,
        config.url.clone(),
        credentials,
    ))
}
