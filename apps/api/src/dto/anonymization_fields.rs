mod conversions;
pub(crate) mod types;
mod validation;

pub use types::{
    FindAnonymizationFieldsQuery, FindAnonymizationFieldsResponse, PerformBulkActionResponse,
};
pub use validation::parse_perform_bulk_action_request;
