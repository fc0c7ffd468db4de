use serde::{Deserialize, Serialize};

use crate::AnonymizationField;

/// Machine-readable reason for a requested mutation that was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BulkActionSkipReason {
    /// The stored field already had the requested values.
    #[serde(rename = "ANONYMIZATION_FIELD_NOT_MODIFIED")]
    AnonymizationFieldNotModified,
}

impl BulkActionSkipReason {
    /// Returns the stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AnonymizationFieldNotModified => "ANONYMIZATION_FIELD_NOT_MODIFIED",
        }
    }
}

/// An item that was accepted but left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkActionSkip {
    /// Record identifier.
    pub id: String,
    /// Field name, when known.
    pub name: Option<String>,
    /// Why no write happened.
    pub skip_reason: BulkActionSkipReason,
}

/// An item that could not be processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkActionItemError {
    /// Record identifier, or the requested field name for failed creations.
    pub id: String,
    /// Field name, when known.
    pub name: Option<String>,
    /// Human-readable failure message.
    pub message: String,
    /// HTTP-style status describing the failure class.
    pub status_code: u16,
    /// Optional machine-readable error code.
    pub err_code: Option<String>,
}

/// Identifier pair of one item inside an error group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkActionErrorItem {
    /// Record identifier.
    pub id: String,
    /// Field name, when known.
    pub name: Option<String>,
}

/// Item errors that share the same message, status and code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkActionErrorGroup {
    /// Shared failure message.
    pub message: String,
    /// Shared status code.
    pub status_code: u16,
    /// Shared error code.
    pub err_code: Option<String>,
    /// Affected items in first-seen order.
    pub items: Vec<BulkActionErrorItem>,
}

/// Counters of a bulk action.
///
/// `succeeded + failed + skipped == total` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkActionSummary {
    failed: u32,
    skipped: u32,
    succeeded: u32,
    total: u32,
}

impl BulkActionSummary {
    /// Builds a summary from the three outcome counters.
    #[must_use]
    pub fn new(succeeded: u32, skipped: u32, failed: u32) -> Self {
        Self {
            failed,
            skipped,
            succeeded,
            total: succeeded.saturating_add(skipped).saturating_add(failed),
        }
    }

    /// Returns the number of failed items.
    #[must_use]
    pub fn failed(&self) -> u32 {
        self.failed
    }

    /// Returns the number of skipped items.
    #[must_use]
    pub fn skipped(&self) -> u32 {
        self.skipped
    }

    /// Returns the number of applied items.
    #[must_use]
    pub fn succeeded(&self) -> u32 {
        self.succeeded
    }

    /// Returns the number of processed items.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }
}

/// Partition of every processed item into result buckets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkActionOutcome {
    /// Records written by `create` items.
    pub created: Vec<AnonymizationField>,
    /// Records written by `update` items.
    pub updated: Vec<AnonymizationField>,
    /// Identifiers removed by the `delete` selector.
    pub deleted: Vec<String>,
    /// Items left untouched.
    pub skipped: Vec<BulkActionSkip>,
    /// Items that failed.
    pub errors: Vec<BulkActionItemError>,
}

impl BulkActionOutcome {
    /// Returns whether any item failed.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Computes the summary counters for this outcome.
    #[must_use]
    pub fn summary(&self) -> BulkActionSummary {
        let succeeded = self.created.len() + self.updated.len() + self.deleted.len();
        BulkActionSummary::new(
            saturating_count(succeeded),
            saturating_count(self.skipped.len()),
            saturating_count(self.errors.len()),
        )
    }

    /// Groups item errors by message, status code and error code.
    #[must_use]
    pub fn error_groups(&self) -> Vec<BulkActionErrorGroup> {
        let mut groups: Vec<BulkActionErrorGroup> = Vec::new();

        for error in &self.errors {
            let item = BulkActionErrorItem {
                id: error.id.clone(),
                name: error.name.clone(),
            };

            match groups.iter_mut().find(|group| {
                group.message == error.message
                    && group.status_code == error.status_code
                    && group.err_code == error.err_code
            }) {
                Some(group) => group.items.push(item),
                None => groups.push(BulkActionErrorGroup {
                    message: error.message.clone(),
                    status_code: error.status_code,
                    err_code: error.err_code.clone(),
                    items: vec![item],
                }),
            }
        }

        groups
    }
}

fn saturating_count(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{
        BulkActionItemError, BulkActionOutcome, BulkActionSkip, BulkActionSkipReason,
        BulkActionSummary,
    };

    fn item_error(id: &str, message: &str, status_code: u16) -> BulkActionItemError {
        BulkActionItemError {
            id: id.to_owned(),
            name: None,
            message: message.to_owned(),
            status_code,
            err_code: None,
        }
    }

    #[test]
    fn skip_reason_uses_screaming_case_literal() {
        let reason = BulkActionSkipReason::AnonymizationFieldNotModified;
        assert_eq!(reason.as_str(), "ANONYMIZATION_FIELD_NOT_MODIFIED");
        assert_eq!(
            serde_json::to_value(reason).ok(),
            Some(serde_json::json!("ANONYMIZATION_FIELD_NOT_MODIFIED"))
        );
    }

    #[test]
    fn summary_counts_every_bucket() {
        let outcome = BulkActionOutcome {
            created: Vec::new(),
            updated: Vec::new(),
            deleted: vec!["a".to_owned(), "b".to_owned()],
            skipped: vec![BulkActionSkip {
                id: "c".to_owned(),
                name: Some("host.name".to_owned()),
                skip_reason: BulkActionSkipReason::AnonymizationFieldNotModified,
            }],
            errors: vec![item_error("d", "Anonymization field not found", 404)],
        };

        let summary = outcome.summary();
        assert_eq!(summary.succeeded(), 2);
        assert_eq!(summary.skipped(), 1);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.total(), 4);
        assert!(outcome.has_errors());
    }

    #[test]
    fn error_groups_merge_items_with_same_failure() {
        let outcome = BulkActionOutcome {
            errors: vec![
                item_error("a", "Anonymization field not found", 404),
                item_error("b", "Anonymization field already exists", 409),
                item_error("c", "Anonymization field not found", 404),
            ],
            ..BulkActionOutcome::default()
        };

        let groups = outcome.error_groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].status_code, 404);
        assert_eq!(
            groups[0]
                .items
                .iter()
                .map(|item| item.id.as_str())
                .collect::<Vec<_>>(),
            vec!["a", "c"]
        );
        assert_eq!(groups[1].items.len(), 1);
    }

    #[test]
    fn empty_outcome_has_zero_summary() {
        let outcome = BulkActionOutcome::default();
        assert_eq!(outcome.summary(), BulkActionSummary::default());
        assert!(!outcome.has_errors());
        assert!(outcome.error_groups().is_empty());
    }

    proptest! {
        #[test]
        fn summary_total_is_sum_of_counters(
            succeeded in 0u32..10_000,
            skipped in 0u32..10_000,
            failed in 0u32..10_000,
        ) {
            let summary = BulkActionSummary::new(succeeded, skipped, failed);
            prop_assert_eq!(
                summary.succeeded() + summary.skipped() + summary.failed(),
                summary.total()
            );
        }
    }
}
