use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{Value, json};
use tracing::{info, warn};
use url::Url;
use vigil_application::{IndexProvisioning, StreamStore};
use vigil_core::{AppError, AppResult};

/// Basic-auth credentials for the document store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElasticsearchCredentials {
    /// User name.
    pub username: String,
    /// Password.
    pub password: String,
}

/// Stream store backed by an Elasticsearch-compatible HTTP API.
#[derive(Clone)]
pub struct ElasticsearchStreamStore {
    http_client: reqwest::Client,
    base_url: Url,
    credentials: Option<ElasticsearchCredentials>,
}

impl ElasticsearchStreamStore {
    /// Creates a store that talks to the cluster at `base_url`.
    #[must_use]
    pub fn new(
        http_client: reqwest::Client,
        base_url: Url,
        credentials: Option<ElasticsearchCredentials>,
    ) -> Self {
        Self {
            http_client,
            base_url,
            credentials,
        }
    }

    fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                AppError::Internal(format!(
                    "store url '{}' cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.credentials {
            Some(credentials) => {
                builder.basic_auth(&credentials.username, Some(&credentials.password))
            }
            None => builder,
        }
    }

    async fn send(
        &self,
        builder: reqwest::RequestBuilder,
        operation: &str,
    ) -> AppResult<reqwest::Response> {
        self.authorize(builder).send().await.map_err(|error| {
            AppError::Internal(format!("store request '{operation}' failed: {error}"))
        })
    }
}

#[async_trait]
impl StreamStore for ElasticsearchStreamStore {
    async fn ensure_index(&self, index: &str, mappings: &Value) -> AppResult<IndexProvisioning> {
        if self.index_exists(index).await? {
            return Ok(IndexProvisioning::AlreadyExists);
        }

        let url = self.endpoint(&[index])?;
        let response = self
            .send(
                self.http_client
                    .put(url)
                    .json(&json!({ "mappings": mappings })),
                "create index",
            )
            .await?;

        let status = response.status();
        if status.is_success() {
            info!(index, "created streams index");
            return Ok(IndexProvisioning::Created);
        }

        let body = response_text(response).await;
        if is_already_exists(status, &body) {
            return Ok(IndexProvisioning::AlreadyExists);
        }

        Err(classify_error_response(status, &body))
    }

    async fn index_exists(&self, index: &str) -> AppResult<bool> {
        let url = self.endpoint(&[index])?;
        let response = self
            .send(self.http_client.head(url), "check index")
            .await?;

        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => {
                let body = response_text(response).await;
                Err(classify_error_response(status, &body))
            }
        }
    }

    async fn get_document(&self, index: &str, id: &str) -> AppResult<Option<Value>> {
        let url = self.endpoint(&[index, "_doc", id])?;
        let response = self
            .send(self.http_client.get(url), "get document")
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !status.is_success() {
            let body = response_text(response).await;
            return Err(classify_error_response(status, &body));
        }

        let body = response.json::<Value>().await.map_err(|error| {
            AppError::Internal(format!(
                "failed to decode document '{id}' from index '{index}': {error}"
            ))
        })?;

        Ok(body.get("_source").cloned())
    }

    async fn put_document(&self, index: &str, id: &str, document: &Value) -> AppResult<()> {
        let mut url = self.endpoint(&[index, "_doc", id])?;
        url.query_pairs_mut().append_pair("refresh", "wait_for");

        let response = self
            .send(self.http_client.put(url).json(document), "put document")
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response_text(response).await;
        warn!(index, id, status = status.as_u16(), "document write rejected");
        Err(classify_error_response(status, &body))
    }
}

async fn response_text(response: reqwest::Response) -> String {
    response
        .text()
        .await
        .unwrap_or_else(|_| "<response body unavailable>".to_owned())
}

fn error_type_and_reason(body: &str) -> (Option<String>, Option<String>) {
    let Ok(parsed) = serde_json::from_str::<Value>(body) else {
        return (None, None);
    };

    let error = parsed.get("error");
    let error_type = error
        .and_then(|error| error.get("type"))
        .and_then(Value::as_str)
        .map(str::to_owned);
    let reason = error
        .and_then(|error| error.get("reason"))
        .and_then(Value::as_str)
        .map(str::to_owned);

    (error_type, reason)
}

fn is_already_exists(status: StatusCode, body: &str) -> bool {
    status == StatusCode::BAD_REQUEST
        && error_type_and_reason(body).0.as_deref() == Some("resource_already_exists_exception")
}

/// Maps a failed store response to an application error.
///
/// Authentication and authorization rejections become
/// [`AppError::SecurityPolicy`]; everything else is internal.
pub fn classify_error_response(status: StatusCode, body: &str) -> AppError {
    let (error_type, reason) = error_type_and_reason(body);
    let reason = reason.unwrap_or_else(|| body.trim().to_owned());

    let is_security = matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        || error_type.as_deref() == Some("security_exception");
    if is_security {
        return AppError::SecurityPolicy(reason);
    }

    AppError::Internal(format!(
        "store request failed with status {}: {reason}",
        status.as_u16()
    ))
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use url::Url;
    use vigil_core::AppError;

    use super::{ElasticsearchStreamStore, classify_error_response, is_already_exists};

    fn store(base: &str) -> ElasticsearchStreamStore {
        let base_url = Url::parse(base).unwrap_or_else(|_| unreachable!());
        ElasticsearchStreamStore::new(reqwest::Client::new(), base_url, None)
    }

    #[test]
    fn forbidden_responses_are_security_errors() {
        let body = r#"{"error":{"type":"security_exception","reason":"action [indices:admin/create] is unauthorized for user [viewer]"},"status":403}"#;

        let error = classify_error_response(StatusCode::FORBIDDEN, body);
        assert!(matches!(
            error,
            AppError::SecurityPolicy(reason) if reason.contains("unauthorized for user [viewer]")
        ));
    }

    #[test]
    fn security_exception_type_wins_over_status() {
        let body = r#"{"error":{"type":"security_exception","reason":"missing authentication credentials"}}"#;

        assert!(matches!(
            classify_error_response(StatusCode::INTERNAL_SERVER_ERROR, body),
            AppError::SecurityPolicy(_)
        ));
    }

    #[test]
    fn other_failures_are_internal() {
        let error = classify_error_response(StatusCode::SERVICE_UNAVAILABLE, "cluster is starting");

        assert!(matches!(
            error,
            AppError::Internal(message) if message == "store request failed with status 503: cluster is starting"
        ));
    }

    #[test]
    fn detects_index_creation_races() {
        let body = r#"{"error":{"type":"resource_already_exists_exception","reason":"index [.vigil_streams/abc] already exists"}}"#;

        assert!(is_already_exists(StatusCode::BAD_REQUEST, body));
        assert!(!is_already_exists(StatusCode::CONFLICT, body));
        assert!(!is_already_exists(StatusCode::BAD_REQUEST, "{}"));
    }

    #[test]
    fn endpoints_keep_base_path_and_encode_ids() {
        let with_prefix = store("https://search.internal:9200/es/");
        let url = with_prefix.endpoint(&[".vigil_streams", "_doc", "logs/a b"]);
        assert_eq!(
            url.map(|url| url.to_string()).ok().as_deref(),
            Some("https://search.internal:9200/es/.vigil_streams/_doc/logs%2Fa%20b")
        );

        let bare = store("http://localhost:9200");
        let url = bare.endpoint(&[".vigil_streams"]);
        assert_eq!(
            url.map(|url| url.to_string()).ok().as_deref(),
            Some("http://localhost:9200/.vigil_streams")
        );
    }
}
