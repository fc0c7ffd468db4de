use serde::{Deserialize, Serialize};
use ts_rs::TS;
use vigil_application::StreamsStatus;

/// Response of the streams provisioning endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/enable-streams-response.ts"
)]
pub struct EnableStreamsResponse {
    pub acknowledged: bool,
}

/// Response of the streams status endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/streams-status-response.ts"
)]
pub struct StreamsStatusResponse {
    pub enabled: bool,
}

impl From<StreamsStatus> for StreamsStatusResponse {
    fn from(value: StreamsStatus) -> Self {
        Self {
            enabled: value.enabled,
        }
    }
}
