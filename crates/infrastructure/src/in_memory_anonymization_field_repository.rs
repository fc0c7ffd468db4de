use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use vigil_application::{
    AnonymizationFieldChanges, AnonymizationFieldFindQuery, AnonymizationFieldPage,
    AnonymizationFieldRepository, AnonymizationFieldSortField, AnonymizationFieldWriteFailure,
    AnonymizationFieldWriteResult, SortOrder,
};
use vigil_core::{AppResult, Namespace};
use vigil_domain::{AnonymizationField, AnonymizationFieldFilter, AnonymizationFieldId};

#[cfg(test)]
mod tests;

type RecordKey = (Namespace, AnonymizationFieldId);

/// In-memory anonymization field repository implementation.
#[derive(Debug, Default)]
pub struct InMemoryAnonymizationFieldRepository {
    records: RwLock<HashMap<RecordKey, AnonymizationField>>,
}

impl InMemoryAnonymizationFieldRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    fn namespace_records<'a>(
        records: &'a HashMap<RecordKey, AnonymizationField>,
        namespace: &'a Namespace,
    ) -> impl Iterator<Item = &'a AnonymizationField> + 'a {
        records
            .iter()
            .filter_map(move |((stored_namespace, _), record)| {
                (stored_namespace == namespace).then_some(record)
            })
    }
}

#[async_trait]
impl AnonymizationFieldRepository for InMemoryAnonymizationFieldRepository {
    async fn find_by_ids(
        &self,
        namespace: &Namespace,
        ids: &[AnonymizationFieldId],
    ) -> AppResult<Vec<AnonymizationField>> {
        let records = self.records.read().await;

        Ok(ids
            .iter()
            .filter_map(|id| records.get(&(namespace.clone(), id.clone())).cloned())
            .collect())
    }

    async fn find_by_field_names(
        &self,
        namespace: &Namespace,
        field_names: &[String],
    ) -> AppResult<Vec<AnonymizationField>> {
        let records = self.records.read().await;

        Ok(Self::namespace_records(&records, namespace)
            .filter(|record| {
                field_names
                    .iter()
                    .any(|name| name == record.field().as_str())
            })
            .cloned()
            .collect())
    }

    async fn find_matching(
        &self,
        namespace: &Namespace,
        filter: &AnonymizationFieldFilter,
    ) -> AppResult<Vec<AnonymizationField>> {
        let records = self.records.read().await;

        let mut matching: Vec<AnonymizationField> = Self::namespace_records(&records, namespace)
            .filter(|record| filter.matches(record))
            .cloned()
            .collect();
        matching.sort_by(|left, right| {
            compare_records(left, right, AnonymizationFieldSortField::CreatedAt)
        });

        Ok(matching)
    }

    async fn find(
        &self,
        namespace: &Namespace,
        query: &AnonymizationFieldFindQuery,
    ) -> AppResult<AnonymizationFieldPage> {
        let records = self.records.read().await;

        let mut matching: Vec<&AnonymizationField> = Self::namespace_records(&records, namespace)
            .filter(|record| {
                query
                    .filter
                    .as_ref()
                    .is_none_or(|filter| filter.matches(record))
            })
            .collect();
        matching.sort_by(|left, right| {
            let ordering = compare_records(left, right, query.sort_field);
            match query.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        let total = u32::try_from(matching.len()).unwrap_or(u32::MAX);
        let offset = usize::try_from(
            u64::from(query.page.saturating_sub(1)) * u64::from(query.per_page),
        )
        .unwrap_or(usize::MAX);
        let limit = usize::try_from(query.per_page).unwrap_or(usize::MAX);

        Ok(AnonymizationFieldPage {
            page: query.page,
            per_page: query.per_page,
            total,
            data: matching
                .into_iter()
                .skip(offset)
                .take(limit)
                .cloned()
                .collect(),
        })
    }

    async fn apply_changes(
        &self,
        namespace: &Namespace,
        changes: AnonymizationFieldChanges,
    ) -> AppResult<AnonymizationFieldWriteResult> {
        let mut records = self.records.write().await;
        let mut result = AnonymizationFieldWriteResult::default();

        for id in changes.delete {
            if records.remove(&(namespace.clone(), id.clone())).is_none() {
                result.failures.push(AnonymizationFieldWriteFailure {
                    id: id.as_str().to_owned(),
                    name: None,
                    message: "Anonymization field not found".to_owned(),
                    status_code: 404,
                });
                continue;
            }

            result.deleted.push(id);
        }

        for record in changes.update {
            let key = (namespace.clone(), record.id().clone());
            let Some(stored) = records.get_mut(&key) else {
                result.failures.push(AnonymizationFieldWriteFailure {
                    id: record.id().as_str().to_owned(),
                    name: Some(record.field().as_str().to_owned()),
                    message: "Anonymization field not found".to_owned(),
                    status_code: 404,
                });
                continue;
            };

            *stored = record.clone();
            result.updated.push(record);
        }

        for record in changes.create {
            let name_taken = Self::namespace_records(&records, namespace)
                .any(|stored| stored.field() == record.field());
            if name_taken {
                result.failures.push(AnonymizationFieldWriteFailure {
                    id: record.field().as_str().to_owned(),
                    name: Some(record.field().as_str().to_owned()),
                    message: "Anonymization field already exists".to_owned(),
                    status_code: 409,
                });
                continue;
            }

            records.insert((namespace.clone(), record.id().clone()), record.clone());
            result.created.push(record);
        }

        Ok(result)
    }
}

fn compare_records(
    left: &AnonymizationField,
    right: &AnonymizationField,
    sort_field: AnonymizationFieldSortField,
) -> Ordering {
    let primary = match sort_field {
        AnonymizationFieldSortField::Field => left.field().as_str().cmp(right.field().as_str()),
        AnonymizationFieldSortField::CreatedAt => left.created_at().cmp(&right.created_at()),
        AnonymizationFieldSortField::UpdatedAt => left.updated_at().cmp(&right.updated_at()),
    };

    primary.then_with(|| left.id().cmp(right.id()))
}
