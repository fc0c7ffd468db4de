use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use tracing_subscriber::EnvFilter;
use url::Url;
use vigil_application::DEFAULT_BULK_ACTION_MAX_ITEMS;
use vigil_core::{AppError, DEFAULT_NAMESPACE, Namespace};

const DEFAULT_ELASTICSEARCH_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElasticsearchConfig {
    pub url: Url,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub database_url: Option<String>,
    pub api_host: String,
    pub api_port: u16,
    pub elasticsearch: Option<ElasticsearchConfig>,
    pub bulk_action_max_items: usize,
    pub default_namespace: Namespace,
    pub cors_allowed_origin: Option<String>,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");
        Self::from_lookup(migrate_only, |name| env::var(name).ok())
    }

    fn from_lookup(
        migrate_only: bool,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AppError> {
        let optional = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let database_url = optional("DATABASE_URL");
        if migrate_only && database_url.is_none() {
            return Err(AppError::Validation(
                "DATABASE_URL is required to run migrations".to_owned(),
            ));
        }

        let api_host = optional("API_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let api_port = optional("API_PORT")
            .map(|value| {
                value
                    .parse::<u16>()
                    .map_err(|error| AppError::Validation(format!("invalid API_PORT: {error}")))
            })
            .transpose()?
            .unwrap_or(3001);

        let elasticsearch = optional("ELASTICSEARCH_URL")
            .map(|value| {
                let url = Url::parse(value.as_str()).map_err(|error| {
                    AppError::Validation(format!("invalid ELASTICSEARCH_URL: {error}"))
                })?;
                let timeout_ms = optional("ELASTICSEARCH_TIMEOUT_MS")
                    .map(|value| {
                        value.parse::<u64>().map_err(|error| {
                            AppError::Validation(format!(
                                "invalid ELASTICSEARCH_TIMEOUT_MS: {error}"
                            ))
                        })
                    })
                    .transpose()?
                    .unwrap_or(DEFAULT_ELASTICSEARCH_TIMEOUT_MS);

                Ok::<_, AppError>(ElasticsearchConfig {
                    url,
                    username: optional("ELASTICSEARCH_USERNAME"),
                    password: optional("ELASTICSEARCH_PASSWORD"),
                    timeout: Duration::from_millis(timeout_ms),
                })
            })
            .transpose()?;

        let bulk_action_max_items = optional("BULK_ACTION_MAX_ITEMS")
            .map(|value| match value.parse::<usize>() {
                Ok(0) => Err(AppError::Validation(
                    "BULK_ACTION_MAX_ITEMS must be greater than zero".to_owned(),
                )),
                Ok(limit) => Ok(limit),
                Err(error) => Err(AppError::Validation(format!(
                    "invalid BULK_ACTION_MAX_ITEMS: {error}"
                ))),
            })
            .transpose()?
            .unwrap_or(DEFAULT_BULK_ACTION_MAX_ITEMS);

        let default_namespace = Namespace::new(
            optional("DEFAULT_NAMESPACE").unwrap_or_else(|| DEFAULT_NAMESPACE.to_owned()),
        )?;

        Ok(Self {
            migrate_only,
            database_url,
            api_host,
            api_port,
            elasticsearch,
            bulk_action_max_items,
            default_namespace,
            cors_allowed_origin: optional("CORS_ALLOWED_ORIGIN"),
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}
