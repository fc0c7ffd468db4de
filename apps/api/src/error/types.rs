use serde::Serialize;
use ts_rs::TS;

/// API error payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/error-response.ts"
)]
pub struct ErrorResponse {
    #[serde(rename = "statusCode")]
    status_code: u16,
    error: String,
    message: String,
}

impl ErrorResponse {
    pub(super) fn new(status_code: u16, error: String, message: String) -> Self {
        Self {
            status_code,
            error,
            message,
        }
    }
}
