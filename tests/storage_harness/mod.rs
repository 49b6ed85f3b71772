//! Shared test harness for invoice storage and repository testing
//!
//! Provides invoice fixtures, a recording `Navigator`, a `KeyValueStorage`
//! whose writes can be made to fail, and the contract suites in
//! [`storage_contract_tests`].
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//! use storage_harness::*;
//! ```

#![allow(dead_code)]

#[macro_use]
mod storage_contract_tests;

use chrono::NaiveDate;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use invoicer::core::entity::{InvoiceDraft, InvoiceStatus};
use invoicer::core::error::StorageError;
use invoicer::core::store::KeyValueStorage;
use invoicer::repository::InvoiceRepository;
use invoicer::storage::{InMemoryStorage, LocalInvoiceStore};
use invoicer::view::Navigator;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn due(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn draft(name: &str, status: InvoiceStatus) -> InvoiceDraft {
    InvoiceDraft::new(name, due(2025, 1, 15), 500.0, status)
}

/// The "Acme" invoice used throughout the scenarios
pub fn acme() -> InvoiceDraft {
    draft("Acme", InvoiceStatus::Pending)
}

/// A mixed collection: one "Acme Corp", unrelated names, every status
pub fn sample_drafts() -> Vec<InvoiceDraft> {
    vec![
        draft("Acme Corp", InvoiceStatus::Pending),
        draft("Globex", InvoiceStatus::Paid),
        draft("Initech", InvoiceStatus::Unpaid),
        draft("Umbrella", InvoiceStatus::Paid),
        InvoiceDraft::new("Hooli", due(2024, 12, 31), 0.0, InvoiceStatus::Unpaid),
    ]
}

/// Loaded repository over a fresh in-memory storage, plus that storage
pub async fn memory_repository() -> (InvoiceRepository, InMemoryStorage) {
    let storage = InMemoryStorage::new();
    let repository =
        InvoiceRepository::open(Arc::new(LocalInvoiceStore::new(storage.clone()))).await;
    (repository, storage)
}

/// Loaded repository already holding [`sample_drafts`]
pub async fn seeded_repository() -> (InvoiceRepository, InMemoryStorage) {
    let (mut repository, storage) = memory_repository().await;
    for draft in sample_drafts() {
        repository.add(draft).unwrap();
    }
    (repository, storage)
}

// ---------------------------------------------------------------------------
// RecordingNavigator
// ---------------------------------------------------------------------------

/// `Navigator` remembering every pushed route
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn routes(&self) -> Vec<String> {
        self.routes.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.routes.lock().unwrap().last().cloned()
    }
}

impl Navigator for RecordingNavigator {
    fn push(&self, route: &str) {
        self.routes.lock().unwrap().push(route.to_string());
    }
}

// ---------------------------------------------------------------------------
// FlakyStorage
// ---------------------------------------------------------------------------

/// In-memory storage whose writes fail while `failing` is set.
///
/// Clones share both the data and the switch.
#[derive(Clone, Default)]
pub struct FlakyStorage {
    inner: InMemoryStorage,
    failing: Arc<AtomicBool>,
    writes: Arc<AtomicUsize>,
}

impl FlakyStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Successful writes so far
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl KeyValueStorage for FlakyStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::Write {
                key: key.to_string(),
                message: "quota exceeded".to_string(),
            });
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove_item(key)
    }
}
