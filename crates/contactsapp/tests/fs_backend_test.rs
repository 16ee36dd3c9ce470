use contactsapp::error::ContactsError;
use contactsapp::store::{CsvStorage, FsBackend, StorageBackend};
use contactsapp::{Contact, ContactStore, HydrationState, StoreOptions};
use std::fs;
use tempfile::TempDir;

fn setup() -> (TempDir, FsBackend) {
    let dir = TempDir::new().unwrap();
    let backend = FsBackend::new(dir.path().to_path_buf());
    (dir, backend)
}

#[tokio::test]
async fn test_fs_backend_basic_io() {
    let (_dir, backend) = setup();

    // 1. Absent
    assert_eq!(backend.get("contacts").await.unwrap(), None);

    // 2. Write + read
    backend.set("contacts", "Hello World").await.unwrap();
    assert_eq!(
        backend.get("contacts").await.unwrap(),
        Some("Hello World".to_string())
    );

    // 3. Delete, twice
    backend.remove("contacts").await.unwrap();
    assert_eq!(backend.get("contacts").await.unwrap(), None);
    backend.remove("contacts").await.unwrap();
}

#[tokio::test]
async fn test_fs_backend_atomic_write_artifacts() {
    let (dir, backend) = setup();

    backend.set("contacts", "Atomic").await.unwrap();

    let expected_path = dir.path().join("contacts.csv");
    assert!(expected_path.exists());
    assert_eq!(fs::read_to_string(&expected_path).unwrap(), "Atomic");

    // Verify NO .tmp files are left behind
    for entry in fs::read_dir(dir.path()).unwrap() {
        let path = entry.unwrap().path();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(!name.ends_with(".tmp"), "Found leftover tmp file: {}", name);
    }
}

#[tokio::test]
async fn test_fs_backend_creates_missing_root() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("a").join("b");
    let backend = FsBackend::new(nested.clone());

    backend.set("contacts", "x").await.unwrap();
    assert!(nested.join("contacts.csv").exists());
}

#[tokio::test]
async fn test_fs_backend_custom_extension() {
    let (dir, backend) = setup();
    let backend = backend.with_file_ext("txt");

    backend.set("contacts", "plain").await.unwrap();
    assert!(dir.path().join("contacts.txt").exists());
    assert_eq!(backend.file_ext(), ".txt");
}

#[tokio::test]
async fn test_fs_backend_read_error_is_not_absent() {
    let (dir, backend) = setup();
    // A directory where the file should be: exists, but cannot be read as text
    fs::create_dir(dir.path().join("contacts.csv")).unwrap();

    assert!(matches!(
        backend.get("contacts").await,
        Err(ContactsError::Io(_))
    ));
}

#[tokio::test]
async fn test_fs_backend_failed_rename_cleans_up_tmp() {
    let (dir, backend) = setup();
    // A non-empty directory in place of the file makes the final rename fail
    let target = dir.path().join("contacts.csv");
    fs::create_dir_all(target.join("x")).unwrap();

    assert!(matches!(
        backend.set("contacts", "data").await,
        Err(ContactsError::Io(_))
    ));

    let leftovers: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty(), "leftover tmp files: {:?}", leftovers);
    assert!(target.is_dir());
}

#[tokio::test]
async fn test_csv_storage_on_disk() {
    let (dir, backend) = setup();
    let storage = CsvStorage::new(backend);
    let records = vec![Contact::new(
        "Smith, John",
        "Doe",
        "john@example.com",
        "09123456789",
        None,
    )];

    storage.save("contacts", &records).await.unwrap();
    let on_disk = fs::read_to_string(dir.path().join("contacts.csv")).unwrap();
    assert!(on_disk.starts_with("id,firstName,lastName,email,phone,avatarUrl\r\n"));
    assert!(on_disk.contains("\"Smith, John\""));

    assert_eq!(storage.load("contacts").await.unwrap(), Some(records));
}

#[tokio::test]
async fn test_first_run_then_restart() {
    let (dir, _) = setup();
    let backend = || FsBackend::new(dir.path().to_path_buf());

    let first = ContactStore::open(backend(), StoreOptions::default())
        .await
        .unwrap();
    let seeded = first.snapshot();
    assert_eq!(seeded.len(), 9);

    let second = ContactStore::open(backend(), StoreOptions::default())
        .await
        .unwrap();
    assert_eq!(second.snapshot(), seeded);
}

#[tokio::test]
async fn test_corrupt_file_on_disk_is_left_alone() {
    let (dir, backend) = setup();
    let path = dir.path().join("contacts.csv");
    let corrupt = "id,firstName,lastName,email,phone,avatarUrl\n\
                   11111111-1111-1111-1111-111111111111,Ada,Lovelace,ada@example.com,09123456789,\n\
                   22222222-2222-2222-2222-222222222222,Bob,Builder,bob@example.com\n";
    fs::write(&path, corrupt).unwrap();

    let store = ContactStore::with_backend(backend);
    match store.hydrate().await {
        Err(ContactsError::MalformedRecord { row, raw }) => {
            assert_eq!(row, 1);
            assert!(raw.contains("Bob"));
        }
        other => panic!("expected MalformedRecord, got {:?}", other),
    }
    assert_eq!(store.hydration_state(), HydrationState::NotHydrated);
    assert_eq!(fs::read_to_string(&path).unwrap(), corrupt);
}
