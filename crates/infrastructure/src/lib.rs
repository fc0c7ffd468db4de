//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod elasticsearch_stream_store;
mod in_memory_anonymization_field_repository;
mod in_memory_stream_store;
mod postgres_anonymization_field_repository;

pub use elasticsearch_stream_store::{
    ElasticsearchCredentials, ElasticsearchStreamStore, classify_error_response,
};
pub use in_memory_anonymization_field_repository::InMemoryAnonymizationFieldRepository;
pub use in_memory_stream_store::InMemoryStreamStore;
pub use postgres_anonymization_field_repository::PostgresAnonymizationFieldRepository;
