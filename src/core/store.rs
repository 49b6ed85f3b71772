//! Persistence traits for the invoice collection

use crate::core::entity::Invoice;
use crate::core::error::StorageError;
use async_trait::async_trait;

/// A string key-value slot store, the shape of a browser's `localStorage`.
///
/// Implementations must make `set_item` an all-or-nothing replacement of the
/// previous value.
pub trait KeyValueStorage: Send + Sync + 'static {
    /// Read the value under `key`, `None` if absent
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value under `key`
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`; removing an absent key is not an error
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Durable home of the whole invoice collection.
///
/// The repository loads once at start and saves the full collection after
/// every mutation. There is no append log and no partial write.
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// Load the persisted collection; an absent blob is an empty collection
    async fn load(&self) -> Result<Vec<Invoice>, StorageError>;

    /// Replace the persisted collection with `invoices`
    fn save(&self, invoices: &[Invoice]) -> Result<(), StorageError>;
}
