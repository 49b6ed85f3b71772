//! Integration tests for FileStorage.
//!
//! Each test gets its own temporary directory, removed when the storage is
//! dropped.

#![cfg(feature = "file-storage")]

#[macro_use]
mod storage_harness;

use invoicer::core::error::StorageError;
use invoicer::core::store::{InvoiceStore, KeyValueStorage};
use invoicer::repository::InvoiceRepository;
use invoicer::storage::{FileStorage, LocalInvoiceStore};
use std::sync::Arc;
use storage_harness::*;
use tempfile::TempDir;

/// `FileStorage` in a directory that lives as long as the value
pub struct ScratchStorage {
    storage: FileStorage,
    _dir: TempDir,
}

impl ScratchStorage {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();
        Self { storage, _dir: dir }
    }
}

impl KeyValueStorage for ScratchStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage.set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.storage.remove_item(key)
    }
}

key_value_storage_tests!(ScratchStorage::new());
invoice_store_tests!(LocalInvoiceStore::new(ScratchStorage::new()));

// ============================================================================
// Persistence across repository instances
// ============================================================================

#[tokio::test]
async fn test_collection_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();

    let created = {
        let store = LocalInvoiceStore::new(FileStorage::open(dir.path()).unwrap());
        let mut repository = InvoiceRepository::open(Arc::new(store)).await;
        repository.add(acme()).unwrap()
    };

    let store = LocalInvoiceStore::new(FileStorage::open(dir.path()).unwrap());
    let repository = InvoiceRepository::open(Arc::new(store)).await;
    assert_eq!(repository.invoices(), [created]);
    assert!(dir.path().join("invoices.json").exists());
}

#[tokio::test]
async fn test_corrupt_file_is_reported_then_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("invoices.json"), "not json").unwrap();

    let store = Arc::new(LocalInvoiceStore::new(FileStorage::open(dir.path()).unwrap()));
    let mut repository = InvoiceRepository::open(store.clone()).await;
    assert!(matches!(repository.error(), Some(StorageError::Corrupt { .. })));
    assert!(repository.is_empty());

    repository.add(acme()).unwrap();
    assert_eq!(store.load().await.unwrap().len(), 1);
}

#[test]
fn test_rejects_path_like_keys() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::open(dir.path()).unwrap();

    assert!(storage.set_item("../escape", "[]").is_err());
    assert!(storage.set_item("", "[]").is_err());
    assert!(storage.get_item(".hidden").is_err());
}
