use super::*;
use crate::foundation::core::Rgb8;

fn temp_dir(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "chartographer_blob_{tag}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn sample() -> RgbRaster {
    let mut r = RgbRaster::filled(4, 3, Rgb8::new(12, 34, 56));
    r.set_pixel(3, 2, Rgb8::new(200, 100, 0));
    r
}

#[test]
fn fs_store_writes_bmp_keyed_by_id() {
    let dir = temp_dir("roundtrip");
    let store = FsBlobStore::open(&dir).unwrap();
    let id = FragmentId(42);

    store.write(id, &sample()).unwrap();
    assert_eq!(store.path_for(id), dir.join("42.bmp"));
    assert!(store.path_for(id).is_file());
    assert!(!dir.join("42.bmp.tmp").exists());
    assert_eq!(store.read(id).unwrap(), sample());

    store.delete(id).unwrap();
    assert!(!store.path_for(id).exists());
    store.delete(id).unwrap();

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn fs_store_missing_blob_is_storage_failure() {
    let dir = temp_dir("missing");
    let store = FsBlobStore::open(&dir).unwrap();
    let err = store.read(FragmentId(7)).unwrap_err();
    assert!(matches!(err, ChartError::Storage(_)));
    assert!(err.to_string().contains("missing"));
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn fs_store_corrupt_blob_is_storage_failure() {
    let dir = temp_dir("corrupt");
    let store = FsBlobStore::open(&dir).unwrap();
    std::fs::write(store.path_for(FragmentId(3)), b"garbage").unwrap();
    let err = store.read(FragmentId(3)).unwrap_err();
    assert!(matches!(err, ChartError::Storage(_)));
    // decoder cause is kept behind the context
    assert!(err.to_string().contains("decode bmp from memory: "), "{err}");
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn in_memory_store_basic_contract() {
    let store = InMemoryBlobStore::new();
    assert!(store.is_empty());

    store.write(FragmentId(1), &sample()).unwrap();
    assert!(store.contains(FragmentId(1)));
    assert_eq!(store.len(), 1);
    assert_eq!(store.read(FragmentId(1)).unwrap(), sample());

    store.delete(FragmentId(1)).unwrap();
    store.delete(FragmentId(1)).unwrap();
    assert!(matches!(
        store.read(FragmentId(1)),
        Err(ChartError::Storage(_))
    ));
}

#[test]
fn in_memory_store_can_reject_writes() {
    let store = InMemoryBlobStore::new();
    store.fail_writes(true);
    assert!(store.write(FragmentId(1), &sample()).is_err());
    assert!(!store.contains(FragmentId(1)));

    store.fail_writes(false);
    store.write(FragmentId(1), &sample()).unwrap();
    assert!(store.contains(FragmentId(1)));
}
