use std::str::FromStr;

use async_trait::async_trait;
use vigil_core::{AppError, AppResult, Namespace};
use vigil_domain::{AnonymizationField, AnonymizationFieldFilter, AnonymizationFieldId};

/// Sortable attributes of anonymization fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AnonymizationFieldSortField {
    /// Field name.
    Field,
    /// Creation timestamp.
    #[default]
    CreatedAt,
    /// Last update timestamp.
    UpdatedAt,
}

impl AnonymizationFieldSortField {
    /// Returns the stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Field => "field",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

impl FromStr for AnonymizationFieldSortField {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "field" => Ok(Self::Field),
            "created_at" => Ok(Self::CreatedAt),
            "updated_at" => Ok(Self::UpdatedAt),
            _ => Err(AppError::Validation(format!(
                "unknown sort field '{value}'"
            ))),
        }
    }
}

/// Sort direction for list queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

impl FromStr for SortOrder {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(AppError::Validation(format!(
                "unknown sort order '{value}'"
            ))),
        }
    }
}

/// Paginated listing query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnonymizationFieldFindQuery {
    /// One-based page number.
    pub page: u32,
    /// Page size.
    pub per_page: u32,
    /// Optional record selector.
    pub filter: Option<AnonymizationFieldFilter>,
    /// Sort attribute.
    pub sort_field: AnonymizationFieldSortField,
    /// Sort direction.
    pub sort_order: SortOrder,
}

/// One page of anonymization fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnonymizationFieldPage {
    /// One-based page number.
    pub page: u32,
    /// Page size.
    pub per_page: u32,
    /// Number of records matching the query across all pages.
    pub total: u32,
    /// Records on this page.
    pub data: Vec<AnonymizationField>,
}

/// Writes produced by one bulk action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnonymizationFieldChanges {
    /// New records.
    pub create: Vec<AnonymizationField>,
    /// Replacement records for existing identifiers.
    pub update: Vec<AnonymizationField>,
    /// Identifiers to remove.
    pub delete: Vec<AnonymizationFieldId>,
}

impl AnonymizationFieldChanges {
    /// Returns whether there is nothing to write.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.create.is_empty() && self.update.is_empty() && self.delete.is_empty()
    }
}

/// Per-item write failure reported by a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnonymizationFieldWriteFailure {
    /// Identifier of the record that failed.
    pub id: String,
    /// Field name, when known.
    pub name: Option<String>,
    /// Failure message.
    pub message: String,
    /// HTTP-style status describing the failure class.
    pub status_code: u16,
}

/// Applied writes and per-item failures of one `apply_changes` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnonymizationFieldWriteResult {
    /// Records created.
    pub created: Vec<AnonymizationField>,
    /// Records updated.
    pub updated: Vec<AnonymizationField>,
    /// Identifiers deleted.
    pub deleted: Vec<AnonymizationFieldId>,
    /// Items that could not be written.
    pub failures: Vec<AnonymizationFieldWriteFailure>,
}

/// Repository port for anonymization field persistence.
#[async_trait]
pub trait AnonymizationFieldRepository: Send + Sync {
    /// Returns the records with the given identifiers that exist in the namespace.
    async fn find_by_ids(
        &self,
        namespace: &Namespace,
        ids: &[AnonymizationFieldId],
    ) -> AppResult<Vec<AnonymizationField>>;

    /// Returns the records whose field name is one of `field_names`.
    async fn find_by_field_names(
        &self,
        namespace: &Namespace,
        field_names: &[String],
    ) -> AppResult<Vec<AnonymizationField>>;

    /// Returns every record matching the filter.
    async fn find_matching(
        &self,
        namespace: &Namespace,
        filter: &AnonymizationFieldFilter,
    ) -> AppResult<Vec<AnonymizationField>>;

    /// Returns one page of records.
    async fn find(
        &self,
        namespace: &Namespace,
        query: &AnonymizationFieldFindQuery,
    ) -> AppResult<AnonymizationFieldPage>;

    /// Applies deletes, then updates, then creates, reporting per-item failures.
    ///
    /// A failed create is reported under its field name, since its generated
    /// id was never stored.
    async fn apply_changes(
        &self,
        namespace: &Namespace,
        changes: AnonymizationFieldChanges,
    ) -> AppResult<AnonymizationFieldWriteResult>;
}
