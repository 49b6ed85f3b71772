//! Core module containing the invoice model, validation, filtering and the
//! persistence contracts

pub mod dates;
pub mod entity;
pub mod error;
pub mod events;
pub mod filter;
pub mod number;
pub mod store;
pub mod validation;

pub use entity::{Invoice, InvoiceDraft, InvoicePatch, InvoiceStatus};
pub use error::{FieldErrors, RepositoryError, StorageError, ViewError};
pub use events::{EventBus, InvoiceEvent};
pub use filter::{InvoiceFilters, StatusFilter, filter_invoices};
pub use number::{NumberGenerator, TimestampNumberGenerator};
pub use store::{InvoiceStore, KeyValueStorage};
pub use validation::InvoiceForm;
