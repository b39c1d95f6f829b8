use super::*;

// =============================================================
// MemoryStore
// =============================================================

#[test]
fn memory_store_get_absent_is_none() {
    let store = MemoryStore::new();
    assert!(store.get("missing").unwrap().is_none());
}

#[test]
fn memory_store_set_overwrites() {
    let mut store = MemoryStore::new();
    store.set("k", "1").unwrap();
    store.set("k", "2").unwrap();
    assert_eq!(store.get("k").unwrap().as_deref(), Some("2"));
}

// =============================================================
// JSON helpers
// =============================================================

#[test]
fn save_then_load_json_preserves_order() {
    let mut store = MemoryStore::new();
    save_json(&mut store, "ids", &[5_u32, 1, 3]).unwrap();
    assert_eq!(store.get("ids").unwrap().as_deref(), Some("[5,1,3]"));
    let ids: Vec<u32> = load_json(&store, "ids").unwrap().unwrap();
    assert_eq!(ids, vec![5, 1, 3]);
}

#[test]
fn load_json_absent_key_is_none() {
    let store = MemoryStore::new();
    let ids: Option<Vec<u32>> = load_json(&store, "ids").unwrap();
    assert!(ids.is_none());
}

#[test]
fn load_json_reports_decode_errors() {
    let mut store = MemoryStore::new();
    store.set("ids", "not json").unwrap();
    let err = load_json::<Vec<u32>>(&store, "ids").unwrap_err();
    assert!(matches!(err, StorageError::Decode { ref key, .. } if key == "ids"));
    assert_eq!(err.error_code(), "E_STORAGE_DECODE");
}

// =============================================================
// FileStore
// =============================================================

#[test]
fn file_store_missing_file_reads_as_empty() {
    let dir = tempfile::TempDir::new().unwrap();
    let store = FileStore::new(dir.path().join("state.json"));
    assert!(store.get("anything").unwrap().is_none());
}

#[test]
fn file_store_persists_across_instances() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("nested").join("state.json");

    let mut store = FileStore::new(&path);
    store.set("a", "[1,2]").unwrap();
    store.set("b", "\"x\"").unwrap();

    let reopened = FileStore::new(&path);
    assert_eq!(reopened.get("a").unwrap().as_deref(), Some("[1,2]"));
    assert_eq!(reopened.get("b").unwrap().as_deref(), Some("\"x\""));
}

#[test]
fn file_store_leaves_no_temp_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("state.json");
    let mut store = FileStore::new(&path);
    store.set("a", "1").unwrap();
    assert!(path.exists());
    assert!(!dir.path().join("state.json.tmp").exists());
}

#[test]
fn file_store_corrupt_file_is_decode_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, "{ broken").unwrap();
    let store = FileStore::new(&path);
    assert!(matches!(store.get("a"), Err(StorageError::Decode { .. })));
}

#[test]
fn file_store_write_replaces_corrupt_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, "{ broken").unwrap();
    let mut store = FileStore::new(&path);
    store.set("a", "[1]").unwrap();
    assert_eq!(store.get("a").unwrap().as_deref(), Some("[1]"));
}
