use chrono::{Duration, TimeZone, Utc};
use vigil_application::{
    AnonymizationFieldChanges, AnonymizationFieldFindQuery, AnonymizationFieldRepository,
    AnonymizationFieldSortField, SortOrder,
};
use vigil_core::Namespace;
use vigil_domain::{AnonymizationField, AnonymizationFieldFilter, AnonymizationFieldId};

use super::InMemoryAnonymizationFieldRepository;

fn record(id: &str, field: &str, anonymized: bool, minutes: i64) -> AnonymizationField {
    let created_at = Utc
        .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
        + Duration::minutes(minutes);

    AnonymizationField::restore(
        id,
        field,
        true,
        anonymized,
        Namespace::default(),
        created_at,
        "elastic",
        None,
        None,
    )
    .unwrap_or_else(|_| unreachable!())
}

fn id(value: &str) -> AnonymizationFieldId {
    AnonymizationFieldId::new(value).unwrap_or_else(|_| unreachable!())
}

async fn seeded() -> InMemoryAnonymizationFieldRepository {
    let repository = InMemoryAnonymizationFieldRepository::new();
    let written = repository
        .apply_changes(
            &Namespace::default(),
            AnonymizationFieldChanges {
                create: vec![
                    record("a", "user.name", true, 2),
                    record("b", "host.name", false, 0),
                    record("c", "user.email", true, 1),
                ],
                ..AnonymizationFieldChanges::default()
            },
        )
        .await;
    assert!(written.is_ok_and(|written| written.created.len() == 3));
    repository
}

#[tokio::test]
async fn lookups_are_scoped_to_namespace() {
    let repository = seeded().await;
    let other = Namespace::new("team-b").unwrap_or_default();

    let found = repository
        .find_by_ids(&Namespace::default(), &[id("a"), id("missing")])
        .await
        .unwrap_or_default();
    assert_eq!(found.len(), 1);

    let elsewhere = repository
        .find_by_ids(&other, &[id("a")])
        .await
        .unwrap_or_default();
    assert!(elsewhere.is_empty());

    let by_name = repository
        .find_by_field_names(&Namespace::default(), &["host.name".to_owned()])
        .await
        .unwrap_or_default();
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].id().as_str(), "b");
}

#[tokio::test]
async fn find_sorts_filters_and_pages() {
    let repository = seeded().await;

    let page = repository
        .find(
            &Namespace::default(),
            &AnonymizationFieldFindQuery {
                page: 1,
                per_page: 2,
                filter: None,
                sort_field: AnonymizationFieldSortField::Field,
                sort_order: SortOrder::Desc,
            },
        )
        .await;
    assert!(page.is_ok());
    let page = page.unwrap_or_else(|_| unreachable!());
    assert_eq!(page.total, 3);
    let names: Vec<&str> = page
        .data
        .iter()
        .map(|record| record.field().as_str())
        .collect();
    assert_eq!(names, vec!["user.name", "user.email"]);

    let filtered = repository
        .find(
            &Namespace::default(),
            &AnonymizationFieldFindQuery {
                page: 1,
                per_page: 20,
                filter: AnonymizationFieldFilter::parse("anonymized:true").ok(),
                sort_field: AnonymizationFieldSortField::CreatedAt,
                sort_order: SortOrder::Asc,
            },
        )
        .await
        .unwrap_or_else(|_| unreachable!());
    let ids: Vec<&str> = filtered
        .data
        .iter()
        .map(|record| record.id().as_str())
        .collect();
    assert_eq!(ids, vec!["c", "a"]);
}

#[tokio::test]
async fn find_matching_applies_wildcards() {
    let repository = seeded().await;
    let filter = AnonymizationFieldFilter::parse("field:user.*").unwrap_or_else(|_| unreachable!());

    let matching = repository
        .find_matching(&Namespace::default(), &filter)
        .await
        .unwrap_or_default();
    let ids: Vec<&str> = matching
        .iter()
        .map(|record| record.id().as_str())
        .collect();
    assert_eq!(ids, vec!["c", "a"]);
}

#[tokio::test]
async fn apply_changes_reports_per_item_failures() {
    let repository = seeded().await;

    let written = repository
        .apply_changes(
            &Namespace::default(),
            AnonymizationFieldChanges {
                create: vec![record("d", "user.name", false, 5)],
                update: vec![record("gone", "process.name", true, 0)],
                delete: vec![id("b"), id("gone")],
            },
        )
        .await
        .unwrap_or_default();

    assert!(written.created.is_empty());
    assert!(written.updated.is_empty());
    assert_eq!(written.deleted, vec![id("b")]);
    let statuses: Vec<u16> = written
        .failures
        .iter()
        .map(|failure| failure.status_code)
        .collect();
    assert_eq!(statuses, vec![404, 404, 409]);
    assert_eq!(written.failures[2].id, "user.name");
    assert_eq!(written.failures[2].name.as_deref(), Some("user.name"));

    let remaining = repository
        .find_by_ids(&Namespace::default(), &[id("b")])
        .await
        .unwrap_or_default();
    assert!(remaining.is_empty());
}

#[tokio::test]
async fn deletes_run_before_creates_so_names_can_be_reused() {
    let repository = seeded().await;

    let written = repository
        .apply_changes(
            &Namespace::default(),
            AnonymizationFieldChanges {
                create: vec![record("d", "user.name", false, 5)],
                delete: vec![id("a")],
                ..AnonymizationFieldChanges::default()
            },
        )
        .await
        .unwrap_or_default();

    assert!(written.failures.is_empty());
    assert_eq!(written.deleted, vec![id("a")]);
    assert_eq!(written.created.len(), 1);

    let by_name = repository
        .find_by_field_names(&Namespace::default(), &["user.name".to_owned()])
        .await
        .unwrap_or_default();
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].id(), &id("d"));
}
