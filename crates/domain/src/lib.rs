//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod anonymization_field;
mod bulk_action;
mod filter;
mod stream;

pub use anonymization_field::{
    AnonymizationField, AnonymizationFieldId, AnonymizationFieldPatch, NewAnonymizationField,
};
pub use bulk_action::{
    BulkActionErrorGroup, BulkActionErrorItem, BulkActionItemError, BulkActionOutcome,
    BulkActionSkip, BulkActionSkipReason, BulkActionSummary,
};
pub use filter::{AnonymizationFieldFilter, FieldPattern, FilterClause};
pub use stream::{ROOT_STREAM_ID, StreamDefinition};
