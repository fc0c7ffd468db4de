use serde_json::Value;
use vigil_core::{AppError, AppResult};

use super::types::PerformBulkActionRequestBody;

/// Decodes and validates a raw bulk action payload.
///
/// Shape errors and selector rules are reported as [`AppError::Validation`]
/// before any service logic runs.
pub fn parse_perform_bulk_action_request(
    payload: Value,
) -> AppResult<PerformBulkActionRequestBody> {
    let body: PerformBulkActionRequestBody = serde_json::from_value(payload).map_err(|error| {
        AppError::Validation(format!("invalid bulk action request body: {error}"))
    })?;

    if let Some(delete) = &body.delete {
        match (&delete.query, &delete.ids) {
            (None, None) => {
                return Err(AppError::Validation(
                    "delete: either query or ids must be provided".to_owned(),
                ));
            }
            (_, Some(ids)) if ids.is_empty() => {
                return Err(AppError::Validation(
                    "delete.ids: array must contain at least 1 element".to_owned(),
                ));
            }
            _ => {}
        }
    }

    Ok(body)
}
