use sqlx::{Postgres, QueryBuilder};
use vigil_application::{AnonymizationFieldSortField, SortOrder};
use vigil_domain::{FieldPattern, FilterClause};

use super::*;

impl PostgresAnonymizationFieldRepository {
    pub(super) async fn find_matching_impl(
        &self,
        namespace: &Namespace,
        filter: &AnonymizationFieldFilter,
    ) -> AppResult<Vec<AnonymizationField>> {
        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(SELECT_COLUMNS);
        push_namespace_and_filter(&mut builder, namespace, Some(filter));
        builder.push(" ORDER BY created_at ASC, id ASC");

        let rows = builder
            .build_query_as::<AnonymizationFieldRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to query anonymization fields in namespace '{namespace}': {error}"
                ))
            })?;

        rows_to_records(rows)
    }

    pub(super) async fn find_page_impl(
        &self,
        namespace: &Namespace,
        query: &AnonymizationFieldFindQuery,
    ) -> AppResult<AnonymizationFieldPage> {
        let limit = i64::from(query.per_page);
        let offset = i64::from(query.page.saturating_sub(1)) * limit;

        let mut count_builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM anonymization_fields");
        push_namespace_and_filter(&mut count_builder, namespace, query.filter.as_ref());
        let total = count_builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to count anonymization fields in namespace '{namespace}': {error}"
                ))
            })?;

        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(SELECT_COLUMNS);
        push_namespace_and_filter(&mut builder, namespace, query.filter.as_ref());
        push_order_by(&mut builder, query.sort_field, query.sort_order);
        builder.push(" LIMIT ");
        builder.push_bind(limit);
        builder.push(" OFFSET ");
        builder.push_bind(offset);

        let rows = builder
            .build_query_as::<AnonymizationFieldRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to list anonymization fields in namespace '{namespace}': {error}"
                ))
            })?;

        Ok(AnonymizationFieldPage {
            page: query.page,
            per_page: query.per_page,
            total: u32::try_from(total).unwrap_or(u32::MAX),
            data: rows_to_records(rows)?,
        })
    }
}

fn push_namespace_and_filter(
    builder: &mut QueryBuilder<'_, Postgres>,
    namespace: &Namespace,
    filter: Option<&AnonymizationFieldFilter>,
) {
    builder.push(" WHERE namespace = ");
    builder.push_bind(namespace.as_str().to_owned());

    let Some(filter) = filter else {
        return;
    };

    for clause in filter.clauses() {
        builder.push(" AND ");
        match clause {
            FilterClause::Id(id) => {
                builder.push("id = ");
                builder.push_bind(id.clone());
            }
            FilterClause::Field(FieldPattern::Exact(value)) => {
                builder.push("field = ");
                builder.push_bind(value.clone());
            }
            FilterClause::Field(FieldPattern::Wildcard(pattern)) => {
                builder.push("field LIKE ");
                builder.push_bind(like_pattern(pattern));
                builder.push(" ESCAPE '\\'");
            }
            FilterClause::Allowed(value) => {
                builder.push("allowed = ");
                builder.push_bind(*value);
            }
            FilterClause::Anonymized(value) => {
                builder.push("anonymized = ");
                builder.push_bind(*value);
            }
        }
    }
}

fn push_order_by(
    builder: &mut QueryBuilder<'_, Postgres>,
    sort_field: AnonymizationFieldSortField,
    sort_order: SortOrder,
) {
    // NULL updated_at sorts before any timestamp, matching the in-memory adapter.
    let direction = match sort_order {
        SortOrder::Asc => "ASC NULLS FIRST",
        SortOrder::Desc => "DESC NULLS LAST",
    };

    builder.push(" ORDER BY ");
    builder.push(sort_field.as_str());
    builder.push(' ');
    builder.push(direction);
    builder.push(", id ");
    builder.push(direction);
}

/// Converts a `*` wildcard pattern into a `LIKE` pattern with `\` escapes.
fn like_pattern(pattern: &str) -> String {
    let mut converted = String::with_capacity(pattern.len());

    for character in pattern.chars() {
        match character {
            '*' => converted.push('%'),
            '%' | '_' | '\\' => {
                converted.push('\\');
                converted.push(character);
            }
            other => converted.push(other),
        }
    }

    converted
}
