use super::*;

impl PostgresAnonymizationFieldRepository {
    pub(super) async fn apply_changes_impl(
        &self,
        namespace: &Namespace,
        changes: AnonymizationFieldChanges,
    ) -> AppResult<AnonymizationFieldWriteResult> {
        let mut result = AnonymizationFieldWriteResult::default();

        for id in changes.delete {
            match self.delete_record(namespace, &id).await {
                Ok(true) => result.deleted.push(id),
                Ok(false) => result.failures.push(AnonymizationFieldWriteFailure {
                    id: id.as_str().to_owned(),
                    name: None,
                    message: "Anonymization field not found".to_owned(),
                    status_code: 404,
                }),
                Err(error) => {
                    warn!(namespace = %namespace, id = %id, error = %error, "anonymization field delete failed");
                    result.failures.push(AnonymizationFieldWriteFailure {
                        id: id.as_str().to_owned(),
                        name: None,
                        message: error.to_string(),
                        status_code: 500,
                    });
                }
            }
        }

        for record in changes.update {
            match self.update_record(namespace, &record).await {
                Ok(true) => result.updated.push(record),
                Ok(false) => result.failures.push(write_failure(
                    &record,
                    "Anonymization field not found",
                    404,
                )),
                Err(error) => {
                    warn!(namespace = %namespace, id = %record.id(), error = %error, "anonymization field update failed");
                    result
                        .failures
                        .push(write_failure(&record, error.to_string(), 500));
                }
            }
        }

        for record in changes.create {
            match self.insert_record(namespace, &record).await {
                Ok(true) => result.created.push(record),
                Ok(false) => result.failures.push(create_failure(
                    &record,
                    "Anonymization field already exists",
                    409,
                )),
                Err(error) => {
                    warn!(namespace = %namespace, id = %record.id(), error = %error, "anonymization field insert failed");
                    result
                        .failures
                        .push(create_failure(&record, error.to_string(), 500));
                }
            }
        }

        Ok(result)
    }

    async fn insert_record(
        &self,
        namespace: &Namespace,
        record: &AnonymizationField,
    ) -> AppResult<bool> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO anonymization_fields (
                namespace,
                id,
                field,
                allowed,
                anonymized,
                created_at,
                created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(namespace.as_str())
        .bind(record.id().as_str())
        .bind(record.field().as_str())
        .bind(record.allowed())
        .bind(record.anonymized())
        .bind(record.created_at())
        .bind(record.created_by())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to insert anonymization field '{}': {error}",
                record.field()
            ))
        })?;

        Ok(inserted.rows_affected() == 1)
    }

    async fn update_record(
        &self,
        namespace: &Namespace,
        record: &AnonymizationField,
    ) -> AppResult<bool> {
        let updated = sqlx::query(
            r#"
            UPDATE anonymization_fields
            SET allowed = $3,
                anonymized = $4,
                updated_at = $5,
                updated_by = $6
            WHERE namespace = $1 AND id = $2
            "#,
        )
        .bind(namespace.as_str())
        .bind(record.id().as_str())
        .bind(record.allowed())
        .bind(record.anonymized())
        .bind(record.updated_at())
        .bind(record.updated_by())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to update anonymization field '{}': {error}",
                record.id()
            ))
        })?;

        Ok(updated.rows_affected() == 1)
    }

    async fn delete_record(&self, namespace: &Namespace, id: &AnonymizationFieldId) -> AppResult<bool> {
        let deleted = sqlx::query(
            r#"
            DELETE FROM anonymization_fields
            WHERE namespace = $1 AND id = $2
            "#,
        )
        .bind(namespace.as_str())
        .bind(id.as_str())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to delete anonymization field '{id}': {error}"
            ))
        })?;

        Ok(deleted.rows_affected() == 1)
    }
}

fn write_failure(
    record: &AnonymizationField,
    message: impl Into<String>,
    status_code: u16,
) -> AnonymizationFieldWriteFailure {
    AnonymizationFieldWriteFailure {
        id: record.id().as_str().to_owned(),
        name: Some(record.field().as_str().to_owned()),
        message: message.into(),
        status_code,
    }
}

fn create_failure(
    record: &AnonymizationField,
    message: impl Into<String>,
    status_code: u16,
) -> AnonymizationFieldWriteFailure {
    AnonymizationFieldWriteFailure {
        id: record.field().as_str().to_owned(),
        name: Some(record.field().as_str().to_owned()),
        message: message.into(),
        status_code,
    }
}
