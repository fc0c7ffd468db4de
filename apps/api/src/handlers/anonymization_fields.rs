use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Query, State};
use axum::http::StatusCode;
use serde_json::Value;
use vigil_application::{AnonymizationFieldFindQuery, BulkActionInput};
use vigil_core::{AppError, UserIdentity};

use crate::dto::{
    FindAnonymizationFieldsQuery, FindAnonymizationFieldsResponse, PerformBulkActionResponse,
    parse_perform_bulk_action_request,
};
use crate::error::ApiResult;
use crate::state::AppState;


/// Applies a batch of creates, updates and deletes.
///
/// Per-item failures are returned as data with a `500` status.
pub async fn perform_bulk_action_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<PerformBulkActionResponse>)> {
    let Json(payload) = payload.map_err(|rejection| {
        AppError::Validation(format!("invalid JSON body: {}", rejection.body_text()))
    })?;
    let body = parse_perform_bulk_action_request(payload)?;
    let outcome = state
        .anonymization_field_service
        .perform_bulk_action(&user, BulkActionInput::from(body))
        .await?;

    let status = if outcome.has_errors() {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::OK
    };

    Ok((status, Json(PerformBulkActionResponse::from(outcome))))
}

pub async fn find_anonymization_fields_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(query): Query<FindAnonymizationFieldsQuery>,
) -> ApiResult<Json<FindAnonymizationFieldsResponse>> {
    let query = AnonymizationFieldFindQuery::try_from(query)?;
    let page = state.anonymization_field_service.find(&user, query).await?;

    Ok(Json(FindAnonymizationFieldsResponse::from(page)))
}
