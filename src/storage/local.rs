//! JSON blob store for the invoice collection
//!
//! The whole collection lives under a single key as a JSON array. Dates are
//! written as `YYYY-MM-DD` / RFC 3339 and rehydrated leniently on load (see
//! [`crate::core::dates`]).
//!
//! ```text
//! "invoices" → [{"id": "...", "name": "Acme", "number": "INV912345042",
//!                "dueDate": "2025-01-15", "amount": 500.0,
//!                "status": "Pending", "createdAt": "2025-01-02T09:14:03.120Z"}]
//! ```

use crate::core::entity::Invoice;
use crate::core::error::StorageError;
use crate::core::store::{InvoiceStore, KeyValueStorage};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

/// Default storage key for the collection
pub const DEFAULT_KEY: &str = "invoices";

/// `InvoiceStore` keeping the collection as one JSON blob in a
/// `KeyValueStorage`
pub struct LocalInvoiceStore<S: KeyValueStorage> {
    storage: Arc<S>,
    key: String,
}

impl<S: KeyValueStorage> LocalInvoiceStore<S> {
    /// Store under the default `"invoices"` key
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, DEFAULT_KEY)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage: Arc::new(storage),
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

impl<S: KeyValueStorage> Clone for LocalInvoiceStore<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            key: self.key.clone(),
        }
    }
}

/// Parse a stored blob into invoices
pub fn decode(key: &str, blob: &str) -> Result<Vec<Invoice>, StorageError> {
    serde_json::from_str(blob).map_err(|e| StorageError::Corrupt {
        key: key.to_string(),
        message: e.to_string(),
    })
}

/// Serialize invoices into a blob
pub fn encode(key: &str, invoices: &[Invoice]) -> Result<String, StorageError> {
    serde_json::to_string(invoices).map_err(|e| StorageError::Write {
        key: key.to_string(),
        message: e.to_string(),
    })
}

#[async_trait]
impl<S: KeyValueStorage> InvoiceStore for LocalInvoiceStore<S> {
    async fn load(&self) -> Result<Vec<Invoice>, StorageError> {
        let storage = Arc::clone(&self.storage);
        let key = self.key.clone();

        let blob = tokio::task::spawn_blocking({
            let key = key.clone();
            move || storage.get_item(&key)
        })
        .await
        .map_err(|e| StorageError::Task(e.to_string()))??;

        let Some(blob) = blob else {
            debug!(key = %key, "no stored invoices");
            return Ok(Vec::new());
        };

        let invoices = decode(&key, &blob).inspect_err(|e| {
            warn!(key = %key, error = %e, "stored invoices could not be parsed");
        })?;
        debug!(key = %key, count = invoices.len(), "loaded invoices");
        Ok(invoices)
    }

    fn save(&self, invoices: &[Invoice]) -> Result<(), StorageError> {
        let blob = encode(&self.key, invoices)?;
        self.storage.set_item(&self.key, &blob)?;
        debug!(key = %self.key, count = invoices.len(), bytes = blob.len(), "saved invoices");
        Ok(())
    }
}
