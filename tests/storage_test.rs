use std::fs;
use std::sync::Arc;

use country_atlas::filter::{LanguageFilter, Region, RegionFilter};
use country_atlas::preferences::FilterPreferences;
use country_atlas::storage::{get_json, set_json, FileStore, KeyValueStore};
use country_atlas::StorageError;
use tempfile::tempdir;

#[test]
fn missing_file_reads_as_empty() {
    let dir = tempdir().unwrap();
    let store = FileStore::new(dir.path().join("storage.json"));

    assert_eq!(store.get("favorites").unwrap(), None);
}

#[test]
fn values_survive_reopening() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("storage.json");

    let store = FileStore::new(&path);
    store.set("filters.search", "ja").unwrap();
    store.set("favorites:u1", "[]").unwrap();
    store.remove("filters.search").unwrap();

    let reopened = FileStore::new(&path);
    assert_eq!(reopened.get("favorites:u1").unwrap().as_deref(), Some("[]"));
    assert_eq!(reopened.get("filters.search").unwrap(), None);
    assert!(!dir.path().join("storage.json.tmp").exists());
}

#[test]
fn corrupt_file_is_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("storage.json");
    fs::write(&path, "not json").unwrap();

    let store = FileStore::new(&path);

    assert!(matches!(
        store.get("favorites"),
        Err(StorageError::Corrupt { .. })
    ));
}

#[test]
fn json_helpers() {
    let dir = tempdir().unwrap();
    let store = FileStore::new(dir.path().join("storage.json"));

    set_json(&store, "numbers", &[1, 2, 3]).unwrap();
    let numbers: Option<Vec<u8>> = get_json(&store, "numbers").unwrap();
    assert_eq!(numbers, Some(vec![1, 2, 3]));

    store.set("numbers", "oops").unwrap();
    assert!(matches!(
        get_json::<Vec<u8>, _>(&store, "numbers"),
        Err(StorageError::Corrupt { .. })
    ));
}

#[test]
fn filter_preferences_on_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("storage.json");

    let preferences = FilterPreferences::new(Arc::new(FileStore::new(&path)));
    preferences.save_search("ja").unwrap();
    preferences
        .save_region(RegionFilter::Only(Region::Asia))
        .unwrap();
    preferences
        .save_language(&LanguageFilter::Only("Japanese".to_owned()))
        .unwrap();

    let restored = FilterPreferences::new(Arc::new(FileStore::new(&path))).load();

    assert_eq!(restored.search, "ja");
    assert_eq!(restored.region, RegionFilter::Only(Region::Asia));
    assert_eq!(
        restored.language,
        LanguageFilter::Only("Japanese".to_owned())
    );
}

#[test]
fn writes_replace_a_corrupt_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("storage.json");
    fs::write(&path, "{\"favorites:u1\": [oops").unwrap();

    let store = FileStore::new(&path);
    store.set("favorites:u1", "[]").unwrap();

    assert_eq!(store.get("favorites:u1").unwrap().as_deref(), Some("[]"));
    assert_eq!(
        FileStore::new(&path).get("favorites:u1").unwrap().as_deref(),
        Some("[]")
    );
}
