use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::warn;
use vigil_application::{
    AnonymizationFieldChanges, AnonymizationFieldFindQuery, AnonymizationFieldPage,
    AnonymizationFieldRepository, AnonymizationFieldWriteFailure, AnonymizationFieldWriteResult,
};
use vigil_core::{AppError, AppResult, Namespace};
use vigil_domain::{AnonymizationField, AnonymizationFieldFilter, AnonymizationFieldId};

mod query;
mod writes;


const SELECT_COLUMNS: &str = "SELECT namespace, id, field, allowed, anonymized, created_at, created_by, updated_at, updated_by FROM anonymization_fields";

/// PostgreSQL-backed anonymization field repository.
#[derive(Clone)]
pub struct PostgresAnonymizationFieldRepository {
    pool: PgPool,
}

impl PostgresAnonymizationFieldRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AnonymizationFieldRow {
    namespace: String,
    id: String,
    field: String,
    allowed: bool,
    anonymized: bool,
    created_at: DateTime<Utc>,
    created_by: String,
    updated_at: Option<DateTime<Utc>>,
    updated_by: Option<String>,
}

impl TryFrom<AnonymizationFieldRow> for AnonymizationField {
    type Error = AppError;

    fn try_from(row: AnonymizationFieldRow) -> Result<Self, Self::Error> {
        AnonymizationField::restore(
            row.id,
            row.field,
            row.allowed,
            row.anonymized,
            Namespace::new(row.namespace)?,
            row.created_at,
            row.created_by,
            row.updated_at,
            row.updated_by,
        )
    }
}

fn rows_to_records(rows: Vec<AnonymizationFieldRow>) -> AppResult<Vec<AnonymizationField>> {
    rows.into_iter().map(AnonymizationField::try_from).collect()
}

#[async_trait]
impl AnonymizationFieldRepository for PostgresAnonymizationFieldRepository {
    async fn find_by_ids(
        &self,
        namespace: &Namespace,
        ids: &[AnonymizationFieldId],
    ) -> AppResult<Vec<AnonymizationField>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = ids.iter().map(|id| id.as_str().to_owned()).collect();
        let rows = sqlx::query_as::<_, AnonymizationFieldRow>(&format!(
            "{SELECT_COLUMNS} WHERE namespace = $1 AND id = ANY($2)"
        ))
        .bind(namespace.as_str())
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to load anonymization fields by id in namespace '{namespace}': {error}"
            ))
        })?;

        rows_to_records(rows)
    }

    async fn find_by_field_names(
        &self,
        namespace: &Namespace,
        field_names: &[String],
    ) -> AppResult<Vec<AnonymizationField>> {
        if field_names.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, AnonymizationFieldRow>(&format!(
            "{SELECT_COLUMNS} WHERE namespace = $1 AND field = ANY($2)"
        ))
        .bind(namespace.as_str())
        .bind(field_names)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to load anonymization fields by name in namespace '{namespace}': {error}"
            ))
        })?;

        rows_to_records(rows)
    }

    async fn find_matching(
        &self,
        namespace: &Namespace,
        filter: &AnonymizationFieldFilter,
    ) -> AppResult<Vec<AnonymizationField>> {
        self.find_matching_impl(namespace, filter).await
    }

    async fn find(
        &self,
        namespace: &Namespace,
        query: &AnonymizationFieldFindQuery,
    ) -> AppResult<AnonymizationFieldPage> {
        self.find_page_impl(namespace, query).await
    }

    async fn apply_changes(
        &self,
        namespace: &Namespace,
        changes: AnonymizationFieldChanges,
    ) -> AppResult<AnonymizationFieldWriteResult> {
        self.apply_changes_impl(namespace, changes).await
    }
}
