//! View controllers: explicit UI state on top of the repository
//!
//! Each controller owns the ephemeral state of one screen and exposes named
//! transitions instead of independent flags:
//!
//! - [`InvoiceActions`]: row menu and delete confirmation dialog
//! - [`InvoiceFormController`]: add / edit form submission
//! - [`InvoiceListController`]: list page filters and load state
//!
//! Navigation is delegated to an injected [`Navigator`].

pub mod actions;
pub mod form;
pub mod list;
pub mod tasks;

pub use actions::{ActionState, InvoiceActions};
pub use form::{FormMode, InvoiceFormController, SubmitOutcome};
pub use list::{InvoiceListController, ListState};
pub use tasks::{ScheduledTask, TaskScope};

use uuid::Uuid;

/// Route changes requested by views
pub trait Navigator: Send + Sync {
    fn push(&self, route: &str);
}

/// Route of the edit page for an invoice
pub fn edit_route(id: &Uuid) -> String {
    format!("/invoices/edit/{}", id)
}
