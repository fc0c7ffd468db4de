use chrono::{DateTime, SecondsFormat, Utc};
use vigil_application::{
    AnonymizationFieldFindQuery, AnonymizationFieldPage, AnonymizationFieldSortField,
    AnonymizationFieldUpdate, BulkActionInput, BulkDeleteSelector, SortOrder,
};
use vigil_core::AppError;
use vigil_domain::{
    AnonymizationField, AnonymizationFieldFilter, AnonymizationFieldPatch, BulkActionErrorGroup,
    BulkActionOutcome, BulkActionSkip, NewAnonymizationField,
};

use super::types::{
    AnonymizationFieldDetailsInError, AnonymizationFieldResponse, BulkActionSkipResult,
    BulkCrudActionAttributes, BulkCrudActionResults, BulkCrudActionSummary,
    FindAnonymizationFieldsQuery, FindAnonymizationFieldsResponse,
    NormalizedAnonymizationFieldError, PerformBulkActionRequestBody, PerformBulkActionResponse,
};

const DEFAULT_FIND_PAGE: u32 = 1;
const DEFAULT_FIND_PER_PAGE: u32 = 20;

fn timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl From<AnonymizationField> for AnonymizationFieldResponse {
    fn from(value: AnonymizationField) -> Self {
        Self {
            id: value.id().as_str().to_owned(),
            timestamp: Some(timestamp(value.created_at())),
            field: value.field().as_str().to_owned(),
            allowed: Some(value.allowed()),
            anonymized: Some(value.anonymized()),
            updated_at: value.updated_at().map(timestamp),
            updated_by: value.updated_by().map(str::to_owned),
            created_at: Some(timestamp(value.created_at())),
            created_by: Some(value.created_by().to_owned()),
            namespace: Some(value.namespace().as_str().to_owned()),
        }
    }
}

impl From<PerformBulkActionRequestBody> for BulkActionInput {
    fn from(value: PerformBulkActionRequestBody) -> Self {
        Self {
            delete: value.delete.map(|delete| BulkDeleteSelector {
                query: delete.query,
                ids: delete.ids.unwrap_or_default(),
            }),
            create: value
                .create
                .unwrap_or_default()
                .into_iter()
                .map(|item| NewAnonymizationField {
                    field: item.field,
                    allowed: item.allowed,
                    anonymized: item.anonymized,
                })
                .collect(),
            update: value
                .update
                .unwrap_or_default()
                .into_iter()
                .map(|item| AnonymizationFieldUpdate {
                    id: item.id,
                    patch: AnonymizationFieldPatch {
                        allowed: item.allowed,
                        anonymized: item.anonymized,
                    },
                })
                .collect(),
        }
    }
}

impl From<BulkActionSkip> for BulkActionSkipResult {
    fn from(value: BulkActionSkip) -> Self {
        Self {
            id: value.id,
            name: value.name,
            skip_reason: value.skip_reason.as_str().to_owned(),
        }
    }
}

impl From<BulkActionErrorGroup> for NormalizedAnonymizationFieldError {
    fn from(value: BulkActionErrorGroup) -> Self {
        Self {
            message: value.message,
            status_code: value.status_code,
            err_code: value.err_code,
            anonymization_fields: value
                .items
                .into_iter()
                .map(|item| AnonymizationFieldDetailsInError {
                    id: item.id,
                    name: item.name,
                })
                .collect(),
        }
    }
}

impl From<BulkActionOutcome> for PerformBulkActionResponse {
    fn from(value: BulkActionOutcome) -> Self {
        let summary = value.summary();
        let errors: Vec<NormalizedAnonymizationFieldError> = value
            .error_groups()
            .into_iter()
            .map(NormalizedAnonymizationFieldError::from)
            .collect();

        let results = BulkCrudActionResults {
            updated: value
                .updated
                .into_iter()
                .map(AnonymizationFieldResponse::from)
                .collect(),
            created: value
                .created
                .into_iter()
                .map(AnonymizationFieldResponse::from)
                .collect(),
            deleted: value.deleted,
            skipped: value
                .skipped
                .into_iter()
                .map(BulkActionSkipResult::from)
                .collect(),
        };
        let summary_payload = BulkCrudActionSummary {
            failed: summary.failed(),
            skipped: summary.skipped(),
            succeeded: summary.succeeded(),
            total: summary.total(),
        };

        if errors.is_empty() {
            return Self {
                success: Some(true),
                status_code: None,
                message: None,
                anonymization_fields_count: Some(summary.total()),
                attributes: BulkCrudActionAttributes {
                    results,
                    summary: summary_payload,
                    errors: None,
                },
            };
        }

        let message = if summary.succeeded() > 0 {
            "Bulk edit partially failed"
        } else {
            "Bulk edit failed"
        };

        Self {
            success: Some(false),
            status_code: Some(500),
            message: Some(message.to_owned()),
            anonymization_fields_count: None,
            attributes: BulkCrudActionAttributes {
                results,
                summary: summary_payload,
                errors: Some(errors),
            },
        }
    }
}

impl TryFrom<FindAnonymizationFieldsQuery> for AnonymizationFieldFindQuery {
    type Error = AppError;

    fn try_from(value: FindAnonymizationFieldsQuery) -> Result<Self, Self::Error> {
        Ok(Self {
            page: value.page.unwrap_or(DEFAULT_FIND_PAGE),
            per_page: value.per_page.unwrap_or(DEFAULT_FIND_PER_PAGE),
            filter: value
                .filter
                .as_deref()
                .map(AnonymizationFieldFilter::parse)
                .transpose()?,
            sort_field: value
                .sort_field
                .as_deref()
                .map(str::parse::<AnonymizationFieldSortField>)
                .transpose()?
                .unwrap_or_default(),
            sort_order: value
                .sort_order
                .as_deref()
                .map(str::parse::<SortOrder>)
                .transpose()?
                .unwrap_or_default(),
        })
    }
}

impl From<AnonymizationFieldPage> for FindAnonymizationFieldsResponse {
    fn from(value: AnonymizationFieldPage) -> Self {
        Self {
            page: value.page,
            per_page: value.per_page,
            total: value.total,
            data: value
                .data
                .into_iter()
                .map(AnonymizationFieldResponse::from)
                .collect(),
        }
    }
}
