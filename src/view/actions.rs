//! Row actions of the invoice list: context menu and delete dialog
//!
//! # States
//!
//! ```text
//!            open_menu               request_delete            begin_delete
//!   Idle ───────────────▶ MenuOpen ─────────────────▶ DialogOpen ───────────▶ Deleting
//!    ▲                       │ close_menu / request_edit   │ close_dialog       │
//!    └───────────────────────┴─────────────────────────────┘                    │
//!    ▲                         finish_delete(Ok)                                │
//!    └──────────────────────────────────────────────────────────────────────────┤
//!                              finish_delete(Err)                               ▼
//!                                                    DeleteFailed ◀─────────────┘
//!                                      (close_dialog → Idle, begin_delete → Deleting)
//! ```
//!
//! The selected invoice lives inside the state, so it is kept while the menu
//! or dialog is open and dropped only when the flow returns to `Idle`.

use crate::core::entity::Invoice;
use crate::core::error::{RepositoryError, ViewError};
use crate::repository::InvoiceRepository;
use crate::view::{Navigator, edit_route};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum ActionState {
    #[default]
    Idle,
    MenuOpen {
        invoice: Invoice,
    },
    DialogOpen {
        invoice: Invoice,
    },
    Deleting {
        invoice: Invoice,
    },
    DeleteFailed {
        invoice: Invoice,
        error: ViewError,
    },
}

/// Controller for the per-row menu and the delete confirmation dialog
pub struct InvoiceActions {
    state: ActionState,
    navigator: Arc<dyn Navigator>,
    last_deleted: Option<String>,
}

impl InvoiceActions {
    pub fn new(navigator: Arc<dyn Navigator>) -> Self {
        Self {
            state: ActionState::Idle,
            navigator,
            last_deleted: None,
        }
    }

    pub fn state(&self) -> &ActionState {
        &self.state
    }

    /// Invoice the menu or dialog is acting on
    pub fn selected_invoice(&self) -> Option<&Invoice> {
        match &self.state {
            ActionState::Idle => None,
            ActionState::MenuOpen { invoice }
            | ActionState::DialogOpen { invoice }
            | ActionState::Deleting { invoice }
            | ActionState::DeleteFailed { invoice, .. } => Some(invoice),
        }
    }

    pub fn is_menu_open(&self) -> bool {
        matches!(self.state, ActionState::MenuOpen { .. })
    }

    pub fn is_dialog_open(&self) -> bool {
        matches!(
            self.state,
            ActionState::DialogOpen { .. }
                | ActionState::Deleting { .. }
                | ActionState::DeleteFailed { .. }
        )
    }

    pub fn is_deleting(&self) -> bool {
        matches!(self.state, ActionState::Deleting { .. })
    }

    /// Error shown inside the dialog after a failed delete
    pub fn error(&self) -> Option<&ViewError> {
        match &self.state {
            ActionState::DeleteFailed { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Number of the invoice removed by the last successful delete
    pub fn last_deleted(&self) -> Option<&str> {
        self.last_deleted.as_deref()
    }

    // === Transitions ===

    /// Open the row menu for `invoice`. Ignored while a delete is running.
    pub fn open_menu(&mut self, invoice: Invoice) -> bool {
        if self.is_deleting() {
            return false;
        }
        self.state = ActionState::MenuOpen { invoice };
        true
    }

    pub fn close_menu(&mut self) {
        if self.is_menu_open() {
            self.state = ActionState::Idle;
        }
    }

    /// Menu → delete confirmation dialog for the same invoice
    pub fn request_delete(&mut self) -> bool {
        match std::mem::take(&mut self.state) {
            ActionState::MenuOpen { invoice } => {
                self.state = ActionState::DialogOpen { invoice };
                true
            }
            other => {
                self.state = other;
                false
            }
        }
    }

    /// Menu → edit page of the selected invoice
    pub fn request_edit(&mut self) -> bool {
        match std::mem::take(&mut self.state) {
            ActionState::MenuOpen { invoice } => {
                self.navigator.push(&edit_route(&invoice.id));
                true
            }
            other => {
                self.state = other;
                false
            }
        }
    }

    /// Dismiss the dialog (cancel, or close after an error)
    pub fn close_dialog(&mut self) {
        if matches!(
            self.state,
            ActionState::DialogOpen { .. } | ActionState::DeleteFailed { .. }
        ) {
            self.state = ActionState::Idle;
        }
    }

    /// Enter `Deleting` and return the id to delete.
    ///
    /// Valid from the open dialog and from a failed attempt (retry).
    pub fn begin_delete(&mut self) -> Option<Uuid> {
        match std::mem::take(&mut self.state) {
            ActionState::DialogOpen { invoice } | ActionState::DeleteFailed { invoice, .. } => {
                let id = invoice.id;
                self.state = ActionState::Deleting { invoice };
                Some(id)
            }
            other => {
                self.state = other;
                None
            }
        }
    }

    /// Record the outcome of the delete started by [`begin_delete`](Self::begin_delete).
    ///
    /// Success (including an invoice that was already gone) returns to `Idle`;
    /// failure keeps the dialog open with the error.
    pub fn finish_delete(&mut self, result: Result<Option<Invoice>, RepositoryError>) {
        let ActionState::Deleting { invoice } = std::mem::take(&mut self.state) else {
            debug!("finish_delete outside of a running delete ignored");
            return;
        };

        match result {
            Ok(_) => {
                self.last_deleted = Some(invoice.number);
                self.state = ActionState::Idle;
            }
            Err(e) => {
                warn!(invoice_id = %invoice.id, error = %e, "delete failed");
                self.state = ActionState::DeleteFailed {
                    invoice,
                    error: ViewError::operation_failed("delete invoice", e),
                };
            }
        }
    }

    /// Confirm the dialog: delete the selected invoice from `repository`
    pub fn confirm_delete(&mut self, repository: &mut InvoiceRepository) -> bool {
        let Some(id) = self.begin_delete() else {
            return false;
        };
        let result = repository.delete(&id);
        let ok = result.is_ok();
        self.finish_delete(result);
        ok
    }
}
