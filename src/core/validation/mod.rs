//! Validation of invoice input
//!
//! Typed drafts are checked with `validator` derives (see
//! [`InvoiceDraft::check`](crate::core::entity::InvoiceDraft::check)); raw form
//! input goes through [`InvoiceForm`] first, which adds presence and parsing
//! messages before building the draft.

pub mod form;

pub use form::{InvoiceForm, NAME_MAX_CHARS};
