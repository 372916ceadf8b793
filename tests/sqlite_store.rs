mod common;

use common::at;
use entry_repo::entities::entry;
use entry_repo::entry::Entry;
use entry_repo::query::{EntryField, EntryQuery, Predicate, SortKey};
use entry_repo::storage::{EntryStore, SqliteEntryStore, StoreChange};

#[tokio::test]
async fn test_in_memory_store_creation() {
    let result = SqliteEntryStore::open_in_memory().await;
    assert!(result.is_ok(), "SqliteEntryStore should be created successfully");
}

#[tokio::test]
async fn test_query_orders_newest_first() {
    let store = SqliteEntryStore::open_in_memory().await.unwrap();
    for secs in [2, 3, 1] {
        store.insert(entry::Model::new(at(secs))).await.unwrap();
    }

    let entries = store.query(&EntryQuery::newest_first()).await.unwrap();
    let times: Vec<_> = entries.iter().map(|e| e.created_at).collect();
    assert_eq!(times, vec![at(3), at(2), at(1)]);
}

#[tokio::test]
async fn test_ties_fall_back_to_insertion_order() {
    let store = SqliteEntryStore::open_in_memory().await.unwrap();
    let first = entry::Model::new(at(5));
    let second = entry::Model::new(at(5));
    let third = entry::Model::new(at(5));
    for model in [&first, &second, &third] {
        store.insert(model.clone()).await.unwrap();
    }

    let query = EntryQuery::newest_first();
    let expected = vec![first.uuid, second.uuid, third.uuid];
    for _ in 0..3 {
        let ids: Vec<_> = store.query(&query).await.unwrap().iter().map(|e| e.uuid).collect();
        assert_eq!(ids, expected);
    }
}

#[tokio::test]
async fn test_predicate_filters_rows() {
    let store = SqliteEntryStore::open_in_memory().await.unwrap();
    let old = entry::Model::new(at(1));
    let recent = entry::Model::new(at(10));
    let mut enabled = entry::Model::new(at(20));
    enabled.set_enabled(true);
    for model in [&old, &recent, &enabled] {
        store.insert(model.clone()).await.unwrap();
    }

    let only_enabled = EntryQuery::new().filter(Predicate::IsEnabled(true));
    let found = store.query(&only_enabled).await.unwrap();
    assert_eq!(found, vec![enabled.clone()]);

    let recent_disabled = EntryQuery::newest_first().filter(Predicate::All(vec![
        Predicate::CreatedAtOrAfter(at(5)),
        Predicate::Not(Box::new(Predicate::IsEnabled(true))),
    ]));
    let found = store.query(&recent_disabled).await.unwrap();
    assert_eq!(found, vec![recent.clone()]);

    let nothing = EntryQuery::new().filter(Predicate::Any(Vec::new()));
    assert!(store.query(&nothing).await.unwrap().is_empty());

    let either = EntryQuery::new()
        .sort_by(SortKey::ascending(EntryField::CreatedAt))
        .filter(Predicate::Any(vec![
            Predicate::CreatedBefore(at(5)),
            Predicate::IsEnabled(true),
        ]));
    let found = store.query(&either).await.unwrap();
    assert_eq!(found, vec![old, enabled]);
}

#[tokio::test]
async fn test_set_enabled_keeps_identity_and_timestamp() {
    let store = SqliteEntryStore::open_in_memory().await.unwrap();
    let model = entry::Model::new(at(7));
    store.insert(model.clone()).await.unwrap();

    store.set_enabled(&model.uuid, true).await.unwrap();

    let stored = store.get(&model.uuid).await.unwrap().expect("entry should exist");
    assert!(stored.is_enabled);
    assert_eq!(stored.uuid, model.uuid);
    assert_eq!(stored.created_at, model.created_at);
}

#[tokio::test]
async fn test_delete_of_unknown_entry_is_a_no_op() {
    let store = SqliteEntryStore::open_in_memory().await.unwrap();
    let kept = entry::Model::new(at(1));
    store.insert(kept.clone()).await.unwrap();
    let revision = store.revision().await.unwrap();
    let mut changes = store.subscribe();

    store.delete(&entry::Model::new(at(2)).uuid).await.unwrap();

    assert_eq!(store.revision().await.unwrap(), revision);
    assert!(changes.try_recv().is_err(), "no-op delete should not notify");
    assert_eq!(store.query(&EntryQuery::new()).await.unwrap(), vec![kept]);
}

#[tokio::test]
async fn test_writes_bump_revision_and_notify() {
    let store = SqliteEntryStore::open_in_memory().await.unwrap();
    let mut changes = store.subscribe();
    let model = entry::Model::new(at(1));

    store.insert(model.clone()).await.unwrap();
    store.set_enabled(&model.uuid, true).await.unwrap();
    store.delete(&model.uuid).await.unwrap();

    assert_eq!(changes.recv().await.unwrap(), StoreChange::Inserted);
    assert_eq!(changes.recv().await.unwrap(), StoreChange::Updated);
    assert_eq!(changes.recv().await.unwrap(), StoreChange::Deleted);
    assert_eq!(store.revision().await.unwrap(), 3);
}

#[tokio::test]
async fn test_duplicate_insert_fails() {
    let store = SqliteEntryStore::open_in_memory().await.unwrap();
    let model = entry::Model::new(at(1));
    store.insert(model.clone()).await.unwrap();

    assert!(store.insert(model).await.is_err());
    assert_eq!(store.revision().await.unwrap(), 1);
}

#[tokio::test]
async fn test_clones_share_data_and_notifications() {
    let store = SqliteEntryStore::open_in_memory().await.unwrap();
    let other = store.clone();
    let mut changes = store.subscribe();

    other.insert(entry::Model::new(at(1))).await.unwrap();

    assert_eq!(changes.recv().await.unwrap(), StoreChange::Inserted);
    assert_eq!(store.query(&EntryQuery::new()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_file_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("entries.sqlite");
    let model = entry::Model::new(at(3));

    {
        let store = SqliteEntryStore::open_path(&path, None).await.unwrap();
        store.insert(model.clone()).await.unwrap();
    }

    let reopened = SqliteEntryStore::open_path(&path, None).await.unwrap();
    assert_eq!(reopened.query(&EntryQuery::new()).await.unwrap(), vec![model]);
    assert_eq!(reopened.revision().await.unwrap(), 1);
}
