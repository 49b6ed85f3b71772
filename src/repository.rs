//! Invoice repository: the in-memory collection and its CRUD operations
//!
//! The repository is the only place the collection is mutated. It loads the
//! persisted collection once, then writes the whole collection back after
//! every mutation. A mutation whose save fails is rolled back, so an `Err`
//! always leaves the collection as it was.
//!
//! # Lifecycle
//!
//! ```text
//! new(store) ── load().await ──▶ ready ──▶ add / update / delete (sync, persisted)
//!  is_loading = true             is_loading = false, error = load failure (if any)
//! ```
//!
//! If the load fails the repository still works as an empty collection and
//! the next save replaces whatever was stored before.

use crate::core::entity::{Invoice, InvoiceDraft, InvoicePatch};
use crate::core::error::{RepositoryError, StorageError};
use crate::core::events::{EventBus, InvoiceEvent};
use crate::core::number::{NumberGenerator, TimestampNumberGenerator};
use crate::core::store::InvoiceStore;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Default number of attempts at finding an unused invoice number
pub const DEFAULT_NUMBER_ATTEMPTS: u32 = 16;

/// In-memory invoice collection synced to an [`InvoiceStore`]
pub struct InvoiceRepository {
    store: Arc<dyn InvoiceStore>,
    numbers: Box<dyn NumberGenerator>,
    max_number_attempts: u32,
    events: Option<EventBus>,
    invoices: Vec<Invoice>,
    is_loading: bool,
    error: Option<StorageError>,
}

impl InvoiceRepository {
    /// Repository that has not loaded yet; call [`load`](Self::load) before
    /// mutating.
    pub fn new(store: Arc<dyn InvoiceStore>) -> Self {
        Self {
            store,
            numbers: Box::new(TimestampNumberGenerator::default()),
            max_number_attempts: DEFAULT_NUMBER_ATTEMPTS,
            events: None,
            invoices: Vec::new(),
            is_loading: true,
            error: None,
        }
    }

    /// Create and load in one step
    pub async fn open(store: Arc<dyn InvoiceStore>) -> Self {
        let mut repository = Self::new(store);
        repository.load().await;
        repository
    }

    /// Replace the invoice number generator
    pub fn with_number_generator(mut self, numbers: impl NumberGenerator + 'static) -> Self {
        self.numbers = Box::new(numbers);
        self
    }

    pub fn with_max_number_attempts(mut self, attempts: u32) -> Self {
        self.max_number_attempts = attempts.max(1);
        self
    }

    /// Publish an [`InvoiceEvent`] on `bus` after each mutation
    pub fn with_events(mut self, bus: EventBus) -> Self {
        self.events = Some(bus);
        self
    }

    /// Load the persisted collection.
    ///
    /// Only the first call reads the store; later calls are no-ops. A failed
    /// load leaves the collection empty and records the error.
    pub async fn load(&mut self) {
        if !self.is_loading {
            return;
        }

        match self.store.load().await {
            Ok(invoices) => {
                info!(count = invoices.len(), "invoices loaded");
                self.invoices = invoices;
                self.error = None;
            }
            Err(e) => {
                warn!(
                    error = %e,
                    "failed to load invoices; continuing with an empty collection, \
                     the next save replaces the stored data"
                );
                self.invoices.clear();
                self.error = Some(e);
            }
        }
        self.is_loading = false;
    }

    /// Discard the in-memory state and load again from the store.
    ///
    /// Used by the list view's retry after a failed load.
    pub async fn reload(&mut self) {
        self.is_loading = true;
        self.error = None;
        self.load().await;
    }

    // === Accessors ===

    pub fn invoices(&self) -> &[Invoice] {
        &self.invoices
    }

    pub fn len(&self) -> usize {
        self.invoices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.invoices.is_empty()
    }

    /// True until the initial load has completed
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Error of the initial load, if it failed
    pub fn error(&self) -> Option<&StorageError> {
        self.error.as_ref()
    }

    pub fn get_by_id(&self, id: &Uuid) -> Option<&Invoice> {
        self.invoices.iter().find(|invoice| &invoice.id == id)
    }

    // === Mutations ===

    /// Validate `draft`, assign id, number and creation time, append and
    /// persist.
    pub fn add(&mut self, draft: InvoiceDraft) -> Result<Invoice, RepositoryError> {
        self.ensure_loaded()?;
        draft.check()?;

        let number = self.unused_number()?;
        let invoice = Invoice::from_draft(draft, number, Utc::now());
        self.invoices.push(invoice.clone());
        if let Err(e) = self.persist() {
            self.invoices.pop();
            return Err(e);
        }
        info!(invoice_id = %invoice.id, number = %invoice.number, "invoice created");

        self.publish(InvoiceEvent::Created {
            invoice: invoice.clone(),
        });
        Ok(invoice)
    }

    /// Merge `patch` into the invoice with `id` and persist.
    ///
    /// Returns `Ok(None)` without writing anything when `id` is unknown.
    pub fn update(
        &mut self,
        id: &Uuid,
        patch: &InvoicePatch,
    ) -> Result<Option<Invoice>, RepositoryError> {
        self.ensure_loaded()?;

        let Some(index) = self.position(id) else {
            debug!(invoice_id = %id, "update of unknown invoice ignored");
            return Ok(None);
        };

        let merged = self.invoices[index].merged(patch)?;
        let previous = std::mem::replace(&mut self.invoices[index], merged.clone());
        if let Err(e) = self.persist() {
            self.invoices[index] = previous;
            return Err(e);
        }
        info!(invoice_id = %id, "invoice updated");

        self.publish(InvoiceEvent::Updated {
            invoice: merged.clone(),
        });
        Ok(Some(merged))
    }

    /// Remove the invoice with `id` and persist.
    ///
    /// Returns `Ok(None)` without writing anything when `id` is unknown.
    pub fn delete(&mut self, id: &Uuid) -> Result<Option<Invoice>, RepositoryError> {
        self.ensure_loaded()?;

        let Some(index) = self.position(id) else {
            debug!(invoice_id = %id, "delete of unknown invoice ignored");
            return Ok(None);
        };

        let removed = self.invoices.remove(index);
        if let Err(e) = self.persist() {
            self.invoices.insert(index, removed);
            return Err(e);
        }
        info!(invoice_id = %id, number = %removed.number, "invoice deleted");

        self.publish(InvoiceEvent::Deleted {
            invoice_id: removed.id,
            number: removed.number.clone(),
        });
        Ok(Some(removed))
    }

    // === Internals ===

    fn ensure_loaded(&self) -> Result<(), RepositoryError> {
        if self.is_loading {
            Err(RepositoryError::NotLoaded)
        } else {
            Ok(())
        }
    }

    fn position(&self, id: &Uuid) -> Option<usize> {
        self.invoices.iter().position(|invoice| &invoice.id == id)
    }

    fn unused_number(&self) -> Result<String, RepositoryError> {
        for attempt in 1..=self.max_number_attempts {
            let candidate = self.numbers.next_number();
            if !self.invoices.iter().any(|invoice| invoice.number == candidate) {
                return Ok(candidate);
            }
            debug!(number = %candidate, attempt, "invoice number collision, retrying");
        }
        Err(RepositoryError::NumberExhausted {
            attempts: self.max_number_attempts,
        })
    }

    fn persist(&self) -> Result<(), RepositoryError> {
        self.store.save(&self.invoices).map_err(|e| {
            warn!(error = %e, "failed to persist invoices; change rolled back");
            RepositoryError::Storage(e)
        })
    }

    fn publish(&self, event: InvoiceEvent) {
        if let Some(bus) = &self.events {
            bus.publish(event);
        }
    }
}
