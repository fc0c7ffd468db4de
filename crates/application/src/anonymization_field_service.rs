use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use vigil_core::{AppError, AppResult, UserIdentity};
use vigil_domain::{
    AnonymizationField, AnonymizationFieldFilter, AnonymizationFieldId, AnonymizationFieldPatch,
    BulkActionItemError, BulkActionOutcome, BulkActionSkip, BulkActionSkipReason,
    NewAnonymizationField,
};

use crate::anonymization_field_ports::{
    AnonymizationFieldChanges, AnonymizationFieldFindQuery, AnonymizationFieldPage,
    AnonymizationFieldRepository,
};

mod bulk;
mod find;


/// Default upper bound on the number of items in one bulk action.
pub const DEFAULT_BULK_ACTION_MAX_ITEMS: usize = 100;

/// Largest accepted page size for listings.
pub const MAX_FIND_PER_PAGE: u32 = 100;

/// Selector of records removed by a bulk action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkDeleteSelector {
    /// Filter query over anonymization fields.
    pub query: Option<String>,
    /// Explicit record identifiers.
    pub ids: Vec<String>,
}

/// One update item of a bulk action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnonymizationFieldUpdate {
    /// Identifier of the record to update.
    pub id: String,
    /// Flags to change.
    pub patch: AnonymizationFieldPatch,
}

/// Operation groups applied together in one bulk action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkActionInput {
    /// Records to remove.
    pub delete: Option<BulkDeleteSelector>,
    /// Records to create.
    pub create: Vec<NewAnonymizationField>,
    /// Records to update.
    pub update: Vec<AnonymizationFieldUpdate>,
}

impl BulkActionInput {
    fn item_count(&self) -> usize {
        self.create.len()
            + self.update.len()
            + self
                .delete
                .as_ref()
                .map(|selector| selector.ids.len())
                .unwrap_or(0)
    }
}

/// Application service for anonymization field operations.
#[derive(Clone)]
pub struct AnonymizationFieldService {
    repository: Arc<dyn AnonymizationFieldRepository>,
    max_bulk_items: usize,
}

impl AnonymizationFieldService {
    /// Creates a new service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn AnonymizationFieldRepository>, max_bulk_items: usize) -> Self {
        Self {
            repository,
            max_bulk_items: max_bulk_items.max(1),
        }
    }

    /// Returns the configured bulk action item limit.
    #[must_use]
    pub fn max_bulk_items(&self) -> usize {
        self.max_bulk_items
    }
}
