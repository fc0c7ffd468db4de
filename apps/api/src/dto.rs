mod anonymization_fields;
mod common;
mod streams;

pub use anonymization_fields::{
    FindAnonymizationFieldsQuery, FindAnonymizationFieldsResponse, PerformBulkActionResponse,
    parse_perform_bulk_action_request,
};
pub use common::{HealthDependencyStatus, HealthResponse};
pub use streams::{EnableStreamsResponse, StreamsStatusResponse};
