//! Postgres-backed repository tests.
//!
//! Require `TEST_DATABASE_URL`; each test returns early when it is unset.
//! Tests share one table and run concurrently, so they only assert on rows
//! they created themselves.

mod common;

use common::*;
use fake::faker::name::en::Name;
use fake::Fake;
use persistence::db::{acquire, create_pool};
use persistence::repositories::{ContactRepository, ContactStore};
use persistence::schema;
use persistence::PersistenceError;
use std::time::{Duration, Instant};

fn unique_email(tag: &str) -> String {
    format!("{}-{}@example.com", tag, uuid::Uuid::new_v4().simple())
}

#[tokio::test]
async fn test_scenario_insert_update_delete() {
    let Some(repo) = test_repository().await else {
        return;
    };
    let email = unique_email("alice");

    let alice = repo.insert("Alice", &email).await.unwrap();
    let listed = repo.list_all().await.unwrap();
    assert_eq!(
        listed.iter().filter(|c| c.id == alice.id).collect::<Vec<_>>(),
        vec![&alice]
    );

    let new_email = unique_email("alicia");
    assert!(repo.update(alice.id, "Alicia", &new_email).await.unwrap());
    let updated = repo
        .list_all()
        .await
        .unwrap()
        .into_iter()
        .find(|c| c.id == alice.id)
        .unwrap();
    assert_eq!(updated.name, "Alicia");
    assert_eq!(updated.email, new_email);

    assert!(repo.delete(alice.id).await.unwrap());
    assert!(repo
        .list_all()
        .await
        .unwrap()
        .iter()
        .all(|c| c.id != alice.id));
}

#[tokio::test]
async fn test_insert_assigns_increasing_ids() {
    let Some(repo) = test_repository().await else {
        return;
    };

    let mut previous = 0;
    for _ in 0..5 {
        let name: String = Name().fake();
        let contact = repo.insert(&name, &unique_email("gen")).await.unwrap();
        assert!(contact.id > previous);
        assert_eq!(contact.name, name);
        previous = contact.id;
    }
}

#[tokio::test]
async fn test_list_all_is_ordered_by_id() {
    let Some(repo) = test_repository().await else {
        return;
    };
    repo.insert("Zed", &unique_email("zed")).await.unwrap();
    repo.insert("Amy", &unique_email("amy")).await.unwrap();

    let ids: Vec<i32> = repo.list_all().await.unwrap().iter().map(|c| c.id).collect();
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test]
async fn test_unknown_id_is_noop() {
    let Some(repo) = test_repository().await else {
        return;
    };
    let contact = repo.insert("Keep", &unique_email("keep")).await.unwrap();

    assert!(!repo.update(i32::MAX, "Ghost", "ghost@x.com").await.unwrap());
    assert!(!repo.delete(i32::MAX).await.unwrap());

    let still_there = repo
        .list_all()
        .await
        .unwrap()
        .into_iter()
        .find(|c| c.id == contact.id);
    assert_eq!(still_there, Some(contact));
}

#[tokio::test]
async fn test_deleted_ids_are_not_reused() {
    let Some(repo) = test_repository().await else {
        return;
    };
    let first = repo.insert("Temp", &unique_email("temp")).await.unwrap();
    repo.delete(first.id).await.unwrap();

    let second = repo.insert("Next", &unique_email("next")).await.unwrap();
    assert!(second.id > first.id);
}

#[tokio::test]
async fn test_ensure_schema_is_idempotent() {
    let Some(pool) = create_test_pool().await else {
        return;
    };

    schema::ensure_schema(&pool).await.unwrap();
    schema::ensure_schema(&pool).await.unwrap();

    let mut conn = acquire(&pool).await.unwrap();
    let tables: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = 'contacts'",
    )
    .fetch_one(&mut *conn)
    .await
    .unwrap();
    assert_eq!(tables, 1);
}

#[tokio::test]
async fn test_connections_return_to_pool() {
    let Some(pool) = create_test_pool().await else {
        return;
    };
    let repo = ContactRepository::new(pool.clone());
    repo.ensure_schema().await.unwrap();

    // Twice the pool size: leaked connections would exhaust it
    for _ in 0..10 {
        repo.list_all().await.unwrap();
    }
    assert!(pool.size() <= 5);
}

#[tokio::test]
async fn test_unreachable_database_is_connection_error() {
    let started = Instant::now();
    let err = create_pool(&unreachable_database()).await.unwrap_err();

    assert!(err.is_connection(), "unexpected error kind: {err:?}");
    assert!(
        matches!(err, PersistenceError::Connection(sqlx::Error::Io(_))),
        "driver error should be kept as the source: {err:?}"
    );
    // A refused connection is reported at once, not after the 1s timeout
    assert!(started.elapsed() < Duration::from_millis(900));
}
