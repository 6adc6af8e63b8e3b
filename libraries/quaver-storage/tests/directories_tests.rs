//! Integration tests for the directories slice

mod test_helpers;

use quaver_storage::{directories, StorageError};
use test_helpers::TestDb;

#[tokio::test]
async fn add_and_get_directory() {
    let db = TestDb::new().await;

    let dir = directories::add(db.pool(), "/music").await.unwrap();
    assert!(dir.id > 0);

    let fetched = directories::get(db.pool(), dir.id).await.unwrap().unwrap();
    assert_eq!(fetched, dir);
}

#[tokio::test]
async fn duplicate_path_is_rejected_without_mutation() {
    let db = TestDb::new().await;

    directories::add(db.pool(), "/music").await.unwrap();
    let err = directories::add(db.pool(), "/music").await.unwrap_err();
    assert!(matches!(err, StorageError::PathAlreadyExists(_)));

    let all = directories::get_all(db.pool()).await.unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn get_missing_directory_returns_none() {
    let db = TestDb::new().await;

    assert!(directories::get(db.pool(), 42).await.unwrap().is_none());
}

#[tokio::test]
async fn list_and_map_agree() {
    let db = TestDb::new().await;

    for i in 0..5 {
        directories::add(db.pool(), format!("/music/{i}")).await.unwrap();
    }

    let list = directories::get_all(db.pool()).await.unwrap();
    let map = directories::get_map(db.pool()).await.unwrap();

    assert_eq!(list.len(), 5);
    assert_eq!(map.len(), 5);
    for dir in &list {
        assert_eq!(map.get(&dir.id), Some(dir));
    }
}

#[tokio::test]
async fn remove_directory_does_not_cascade_to_files() {
    let db = TestDb::new().await;

    let dir = directories::add(db.pool(), "/music").await.unwrap();
    let file = test_helpers::make_file(dir.id, "/music", "a.mp3");
    quaver_storage::files::add(db.pool(), &file).await.unwrap();

    directories::remove(db.pool(), dir.id).await.unwrap();
    assert!(directories::get(db.pool(), dir.id).await.unwrap().is_none());

    // Orphaned file row survives until the scanner purges it
    let files = quaver_storage::files::by_dir(db.pool(), dir.id).await.unwrap();
    assert_eq!(files.len(), 1);
}
