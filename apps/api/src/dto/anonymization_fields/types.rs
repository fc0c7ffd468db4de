use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Selector of anonymization fields removed by a bulk action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/bulk-action-base.ts"
)]
pub struct BulkActionBase {
    /// Query to filter anonymization fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub query: Option<String>,
    /// Array of anonymization field ids.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub ids: Option<Vec<String>>,
}

/// Create item of a bulk action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/anonymization-field-create-props.ts"
)]
pub struct AnonymizationFieldCreateProps {
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub allowed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub anonymized: Option<bool>,
}

/// Update item of a bulk action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/anonymization-field-update-props.ts"
)]
pub struct AnonymizationFieldUpdateProps {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub allowed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub anonymized: Option<bool>,
}

/// Incoming bulk action payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/perform-bulk-action-request-body.ts"
)]
pub struct PerformBulkActionRequestBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub delete: Option<BulkActionBase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub create: Option<Vec<AnonymizationFieldCreateProps>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub update: Option<Vec<AnonymizationFieldUpdateProps>>,
}

/// API representation of an anonymization field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/anonymization-field-response.ts"
)]
pub struct AnonymizationFieldResponse {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub timestamp: Option<String>,
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub allowed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub anonymized: Option<bool>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub updated_at: Option<String>,
    #[serde(rename = "updatedBy", default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub updated_by: Option<String>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub created_at: Option<String>,
    #[serde(rename = "createdBy", default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub created_by: Option<String>,
    /// Platform space owning the record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub namespace: Option<String>,
}

/// Item left untouched by a bulk action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/bulk-action-skip-result.ts"
)]
pub struct BulkActionSkipResult {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub name: Option<String>,
    #[ts(type = "\"ANONYMIZATION_FIELD_NOT_MODIFIED\"")]
    pub skip_reason: String,
}

/// Identifies one failed item inside an error group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/anonymization-field-details-in-error.ts"
)]
pub struct AnonymizationFieldDetailsInError {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub name: Option<String>,
}

/// Failed items sharing one message and status code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/normalized-anonymization-field-error.ts"
)]
pub struct NormalizedAnonymizationFieldError {
    pub message: String,
    pub status_code: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub err_code: Option<String>,
    pub anonymization_fields: Vec<AnonymizationFieldDetailsInError>,
}

/// Per-bucket results of a bulk action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/bulk-crud-action-results.ts"
)]
pub struct BulkCrudActionResults {
    pub updated: Vec<AnonymizationFieldResponse>,
    pub created: Vec<AnonymizationFieldResponse>,
    pub deleted: Vec<String>,
    pub skipped: Vec<BulkActionSkipResult>,
}

/// Bulk action counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/bulk-crud-action-summary.ts"
)]
pub struct BulkCrudActionSummary {
    pub failed: u32,
    pub skipped: u32,
    pub succeeded: u32,
    pub total: u32,
}

/// Results, summary and grouped errors of a bulk action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/bulk-crud-action-attributes.ts"
)]
pub struct BulkCrudActionAttributes {
    pub results: BulkCrudActionResults,
    pub summary: BulkCrudActionSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub errors: Option<Vec<NormalizedAnonymizationFieldError>>,
}

/// Bulk action response payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/perform-bulk-action-response.ts"
)]
pub struct PerformBulkActionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub status_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub anonymization_fields_count: Option<u32>,
    pub attributes: BulkCrudActionAttributes,
}

/// Query string of the find endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FindAnonymizationFieldsQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub filter: Option<String>,
    pub sort_field: Option<String>,
    pub sort_order: Option<String>,
}

/// One page of anonymization fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/find-anonymization-fields-response.ts"
)]
pub struct FindAnonymizationFieldsResponse {
    pub page: u32,
    #[serde(rename = "perPage")]
    pub per_page: u32,
    pub total: u32,
    pub data: Vec<AnonymizationFieldResponse>,
}
