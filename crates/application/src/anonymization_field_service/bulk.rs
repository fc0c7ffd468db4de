use super::*;

const NOT_FOUND_MESSAGE: &str = "Anonymization field not found";
const ALREADY_EXISTS_MESSAGE: &str = "Anonymization field already exists";

impl AnonymizationFieldService {
    /// Applies the delete, update and create groups of a bulk action.
    ///
    /// Structural problems (item limit, blank or duplicated identifiers,
    /// malformed delete selector) fail the whole call. Per-item problems are
    /// reported in the outcome's skipped and error buckets.
    pub async fn perform_bulk_action(
        &self,
        actor: &UserIdentity,
        input: BulkActionInput,
    ) -> AppResult<BulkActionOutcome> {
        self.validate_bulk_action(&input)?;

        let namespace = actor.namespace();
        let now = Utc::now();
        let mut outcome = BulkActionOutcome::default();
        let mut changes = AnonymizationFieldChanges::default();

        if let Some(selector) = &input.delete {
            let update_ids: HashSet<&str> = input
                .update
                .iter()
                .map(|update| update.id.as_str())
                .collect();
            let targets = self
                .resolve_delete_targets(actor, selector, &update_ids)
                .await?;
            let existing: HashSet<AnonymizationFieldId> = self
                .repository
                .find_by_ids(namespace, &targets)
                .await?
                .into_iter()
                .map(|record| record.id().clone())
                .collect();

            for id in targets {
                if existing.contains(&id) {
                    changes.delete.push(id);
                } else {
                    outcome.errors.push(not_found(id.as_str()));
                }
            }
        }

        if !input.update.is_empty() {
            let ids = input
                .update
                .iter()
                .map(|update| AnonymizationFieldId::new(update.id.as_str()))
                .collect::<AppResult<Vec<_>>>()?;
            let existing: HashMap<AnonymizationFieldId, AnonymizationField> = self
                .repository
                .find_by_ids(namespace, &ids)
                .await?
                .into_iter()
                .map(|record| (record.id().clone(), record))
                .collect();

            for (id, update) in ids.into_iter().zip(input.update) {
                let Some(current) = existing.get(&id) else {
                    outcome.errors.push(not_found(id.as_str()));
                    continue;
                };

                match current.apply_patch(update.patch, actor.subject(), now) {
                    Some(patched) => changes.update.push(patched),
                    None => outcome.skipped.push(BulkActionSkip {
                        id: id.as_str().to_owned(),
                        name: Some(current.field().as_str().to_owned()),
                        skip_reason: BulkActionSkipReason::AnonymizationFieldNotModified,
                    }),
                }
            }
        }

        if !input.create.is_empty() {
            let field_names: Vec<String> = input
                .create
                .iter()
                .map(|item| item.field.clone())
                .collect();
            let deleted: HashSet<&AnonymizationFieldId> = changes.delete.iter().collect();
            // A name freed by a delete in the same call can be created again.
            let existing: HashSet<String> = self
                .repository
                .find_by_field_names(namespace, &field_names)
                .await?
                .into_iter()
                .filter(|record| !deleted.contains(record.id()))
                .map(|record| record.field().as_str().to_owned())
                .collect();

            for item in input.create {
                if existing.contains(&item.field) {
                    outcome.errors.push(BulkActionItemError {
                        id: item.field.clone(),
                        name: Some(item.field),
                        message: ALREADY_EXISTS_MESSAGE.to_owned(),
                        status_code: 409,
                        err_code: None,
                    });
                    continue;
                }

                changes.create.push(AnonymizationField::create(
                    item,
                    namespace.clone(),
                    actor.subject(),
                    now,
                )?);
            }
        }

        if !changes.is_empty() {
            let written = self.repository.apply_changes(namespace, changes).await?;
            outcome.created = written.created;
            outcome.updated = written.updated;
            outcome.deleted = written
                .deleted
                .into_iter()
                .map(|id| id.as_str().to_owned())
                .collect();
            outcome
                .errors
                .extend(
                    written
                        .failures
                        .into_iter()
                        .map(|failure| BulkActionItemError {
                            id: failure.id,
                            name: failure.name,
                            message: failure.message,
                            status_code: failure.status_code,
                            err_code: None,
                        }),
                );
        }

        let summary = outcome.summary();
        if outcome.has_errors() {
            warn!(
                namespace = %namespace,
                subject = actor.subject(),
                failed = summary.failed(),
                "anonymization field bulk action completed with item errors"
            );
        }

        info!(
            namespace = %namespace,
            subject = actor.subject(),
            succeeded = summary.succeeded(),
            skipped = summary.skipped(),
            failed = summary.failed(),
            total = summary.total(),
            "anonymization field bulk action applied"
        );

        Ok(outcome)
    }

    fn validate_bulk_action(&self, input: &BulkActionInput) -> AppResult<()> {
        if input.item_count() > self.max_bulk_items {
            return Err(AppError::Validation(format!(
                "More than {} ids sent for bulk edit action.",
                self.max_bulk_items
            )));
        }

        if let Some(selector) = &input.delete {
            if selector.query.is_none() && selector.ids.is_empty() {
                return Err(AppError::Validation(
                    "delete requires either a query or at least one id".to_owned(),
                ));
            }

            if let Some(query) = selector.query.as_deref() {
                AnonymizationFieldFilter::parse(query)?;
            }

            require_non_blank("delete.ids", selector.ids.iter().map(String::as_str))?;
            reject_duplicates("delete.ids", selector.ids.iter().map(String::as_str))?;
        }

        require_non_blank(
            "create.field",
            input.create.iter().map(|item| item.field.as_str()),
        )?;
        reject_duplicates(
            "create.field",
            input.create.iter().map(|item| item.field.as_str()),
        )?;

        require_non_blank(
            "update.id",
            input.update.iter().map(|update| update.id.as_str()),
        )?;
        reject_duplicates(
            "update.id",
            input.update.iter().map(|update| update.id.as_str()),
        )?;

        if let Some(selector) = &input.delete {
            let deleted: HashSet<&str> = selector.ids.iter().map(String::as_str).collect();
            let conflicting: Vec<&str> = input
                .update
                .iter()
                .map(|update| update.id.as_str())
                .filter(|id| deleted.contains(id))
                .collect();

            if !conflicting.is_empty() {
                return Err(AppError::Validation(format!(
                    "Both update and delete actions target the same ids: {}",
                    conflicting.join(", ")
                )));
            }
        }

        Ok(())
    }

    async fn resolve_delete_targets(
        &self,
        actor: &UserIdentity,
        selector: &BulkDeleteSelector,
        update_ids: &HashSet<&str>,
    ) -> AppResult<Vec<AnonymizationFieldId>> {
        let mut targets = selector
            .ids
            .iter()
            .map(|id| AnonymizationFieldId::new(id.as_str()))
            .collect::<AppResult<Vec<_>>>()?;

        let Some(query) = selector.query.as_deref() else {
            return Ok(targets);
        };

        let filter = AnonymizationFieldFilter::parse(query)?;
        let mut seen: HashSet<AnonymizationFieldId> = targets.iter().cloned().collect();

        for record in self
            .repository
            .find_matching(actor.namespace(), &filter)
            .await?
        {
            // Explicit update items win over records selected by the delete query.
            if update_ids.contains(record.id().as_str()) {
                continue;
            }

            if seen.insert(record.id().clone()) {
                targets.push(record.id().clone());
            }
        }

        Ok(targets)
    }
}

fn not_found(id: &str) -> BulkActionItemError {
    BulkActionItemError {
        id: id.to_owned(),
        name: None,
        message: NOT_FOUND_MESSAGE.to_owned(),
        status_code: 404,
        err_code: None,
    }
}

fn require_non_blank<'a>(label: &str, values: impl Iterator<Item = &'a str>) -> AppResult<()> {
    for (index, value) in values.enumerate() {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!(
                "{label}[{index}] must not be empty"
            )));
        }
    }

    Ok(())
}

fn reject_duplicates<'a>(label: &str, values: impl Iterator<Item = &'a str>) -> AppResult<()> {
    let mut seen = HashSet::new();
    let mut duplicates: Vec<&str> = Vec::new();

    for value in values {
        if !seen.insert(value) && !duplicates.contains(&value) {
            duplicates.push(value);
        }
    }

    if duplicates.is_empty() {
        return Ok(());
    }

    Err(AppError::Validation(format!(
        "{label} contains duplicate values: {}",
        duplicates.join(", ")
    )))
}
