//! Application services and ports.

#![forbid(unsafe_code)]

mod anonymization_field_ports;
mod anonymization_field_service;
mod streams_ports;
mod streams_service;

pub use anonymization_field_ports::{
    AnonymizationFieldChanges, AnonymizationFieldFindQuery, AnonymizationFieldPage,
    AnonymizationFieldRepository, AnonymizationFieldSortField, AnonymizationFieldWriteFailure,
    AnonymizationFieldWriteResult, SortOrder,
};
pub use anonymization_field_service::{
    AnonymizationFieldService, AnonymizationFieldUpdate, BulkActionInput, BulkDeleteSelector,
    DEFAULT_BULK_ACTION_MAX_ITEMS, MAX_FIND_PER_PAGE,
};
pub use streams_ports::{IndexProvisioning, StreamStore};
pub use streams_service::{EnableStreamsOutcome, STREAMS_INDEX, StreamsService, StreamsStatus};
