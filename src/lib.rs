//! # Invoicer
//!
//! Data layer of a small invoice manager: the invoice record, its
//! validation, a persisted in-memory repository, list filtering and the
//! state of the views built on top of them.
//!
//! ## Features
//!
//! - **Validated records**: field-level messages for every failing input
//! - **Pluggable persistence**: the whole collection as one JSON blob in any
//!   key-value storage (in-memory or one file per key)
//! - **Unique numbering**: `INV` + timestamp digits, regenerated on collision
//! - **Query-string filters**: search and status mirrored in the list route
//! - **Explicit view state**: menu/dialog state machine, form submission with
//!   cancellable redirect and banner timers
//! - **Change events**: optional broadcast of created/updated/deleted
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use invoicer::prelude::*;
//!
//! let config = AppConfig::from_yaml_str("storage:\n  backend: memory\n")?;
//! let mut repository = config.build_repository()?;
//! repository.load().await;
//!
//! let form = InvoiceForm::new("Acme Corp", "2025-01-15", "500", "Pending");
//! let invoice = repository.add(form.to_draft()?)?;
//! assert!(invoice.number.starts_with("INV"));
//!
//! let filters = InvoiceFilters::from_query("?search=acme&status=Pending");
//! assert_eq!(filters.apply(repository.invoices()).len(), 1);
//! ```

pub mod config;
pub mod core;
pub mod logging;
pub mod repository;
pub mod storage;
pub mod view;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        entity::{Invoice, InvoiceDraft, InvoicePatch, InvoiceStatus},
        error::{FieldErrors, RepositoryError, StorageError, ViewError},
        events::{EventBus, EventEnvelope, InvoiceEvent},
        filter::{InvoiceFilters, LIST_ROUTE, StatusFilter, filter_invoices},
        number::{NumberGenerator, TimestampNumberGenerator},
        store::{InvoiceStore, KeyValueStorage},
        validation::InvoiceForm,
    };

    // === Repository ===
    pub use crate::repository::InvoiceRepository;

    // === Storage ===
    #[cfg(feature = "file-storage")]
    pub use crate::storage::FileStorage;
    pub use crate::storage::{InMemoryStorage, LocalInvoiceStore};

    // === Views ===
    pub use crate::view::{
        ActionState, FormMode, InvoiceActions, InvoiceFormController, InvoiceListController,
        ListState, Navigator, SubmitOutcome, TaskScope, edit_route,
    };

    // === Config ===
    pub use crate::config::{AppConfig, LoggingConfig, StorageBackend};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, NaiveDate, Utc};
    pub use uuid::Uuid;
}
