//! Add / edit invoice form controller
//!
//! Holds the raw form input and the submission state. On success the form is
//! reset, a success banner is shown for a while and the user is redirected to
//! the list after a short delay. Both timers belong to the controller's
//! [`TaskScope`] and die with it.

use crate::core::entity::{Invoice, InvoicePatch};
use crate::core::error::{FieldErrors, RepositoryError, ViewError};
use crate::core::filter::LIST_ROUTE;
use crate::core::validation::InvoiceForm;
use crate::repository::InvoiceRepository;
use crate::view::Navigator;
use crate::view::tasks::TaskScope;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Delay before redirecting to the list after a successful submit
pub const DEFAULT_REDIRECT_DELAY: Duration = Duration::from_millis(2000);

/// How long the success banner stays visible
pub const DEFAULT_SUCCESS_BANNER: Duration = Duration::from_millis(3000);

/// Whether the form creates a new invoice or edits an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(Uuid),
}

/// Result of [`InvoiceFormController::submit`]
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Created(Invoice),
    Updated(Invoice),
    /// Input did not validate; see [`InvoiceFormController::field_errors`]
    Invalid,
    /// Repository rejected the operation; see
    /// [`InvoiceFormController::submit_error`]
    Failed,
}

pub struct InvoiceFormController {
    mode: FormMode,
    form: InvoiceForm,
    field_errors: FieldErrors,
    is_submitting: bool,
    submit_error: Option<ViewError>,
    show_success: Arc<AtomicBool>,
    navigator: Arc<dyn Navigator>,
    timers: TaskScope,
    redirect_delay: Duration,
    success_banner: Duration,
}

impl InvoiceFormController {
    /// Empty form for the add page
    pub fn create(navigator: Arc<dyn Navigator>) -> Self {
        Self::with_form(FormMode::Create, InvoiceForm::default(), navigator)
    }

    /// Form prefilled from `invoice` for the edit page
    pub fn edit(invoice: &Invoice, navigator: Arc<dyn Navigator>) -> Self {
        Self::with_form(
            FormMode::Edit(invoice.id),
            InvoiceForm::from_invoice(invoice),
            navigator,
        )
    }

    fn with_form(mode: FormMode, form: InvoiceForm, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            mode,
            form,
            field_errors: FieldErrors::new(),
            is_submitting: false,
            submit_error: None,
            show_success: Arc::new(AtomicBool::new(false)),
            navigator,
            timers: TaskScope::new(),
            redirect_delay: DEFAULT_REDIRECT_DELAY,
            success_banner: DEFAULT_SUCCESS_BANNER,
        }
    }

    pub fn with_redirect_delay(mut self, delay: Duration) -> Self {
        self.redirect_delay = delay;
        self
    }

    pub fn with_success_banner(mut self, duration: Duration) -> Self {
        self.success_banner = duration;
        self
    }

    // === State ===

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn form(&self) -> &InvoiceForm {
        &self.form
    }

    /// Mutable access for binding input fields
    pub fn form_mut(&mut self) -> &mut InvoiceForm {
        &mut self.form
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub fn submit_error(&self) -> Option<&ViewError> {
        self.submit_error.as_ref()
    }

    pub fn show_success(&self) -> bool {
        self.show_success.load(Ordering::SeqCst)
    }

    /// Number of timers (redirect, banner) still pending
    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    // === Transitions ===

    /// Validate the form and send it to `repository`.
    ///
    /// Input is kept on every failure so the user can correct it.
    pub fn submit(&mut self, repository: &mut InvoiceRepository) -> SubmitOutcome {
        self.is_submitting = true;
        self.submit_error = None;
        let outcome = self.run_submit(repository);
        self.is_submitting = false;
        outcome
    }

    fn run_submit(&mut self, repository: &mut InvoiceRepository) -> SubmitOutcome {
        let draft = match self.form.to_draft() {
            Ok(draft) => draft,
            Err(errors) => {
                debug!(fields = errors.len(), "form input rejected");
                self.field_errors = errors;
                return SubmitOutcome::Invalid;
            }
        };
        self.field_errors = FieldErrors::new();

        let (operation, result) = match self.mode {
            FormMode::Create => (
                "add invoice",
                repository
                    .add(draft)
                    .map(|invoice| Some(SubmitOutcome::Created(invoice))),
            ),
            FormMode::Edit(id) => (
                "update invoice",
                repository
                    .update(&id, &InvoicePatch::from(draft))
                    .map(|updated| updated.map(SubmitOutcome::Updated)),
            ),
        };

        match result {
            Ok(Some(outcome)) => {
                self.succeed();
                outcome
            }
            Ok(None) => {
                warn!(mode = ?self.mode, "edited invoice no longer exists");
                self.submit_error = Some(ViewError::operation_failed(operation, "invoice not found"));
                SubmitOutcome::Failed
            }
            Err(RepositoryError::Validation(errors)) => {
                self.field_errors = errors;
                SubmitOutcome::Invalid
            }
            Err(e) => {
                warn!(error = %e, operation, "form submission failed");
                self.submit_error = Some(ViewError::operation_failed(operation, e));
                SubmitOutcome::Failed
            }
        }
    }

    fn succeed(&mut self) {
        info!(mode = ?self.mode, "form submitted");
        if self.mode == FormMode::Create {
            self.form.clear();
        }
        self.show_success.store(true, Ordering::SeqCst);

        let banner = Arc::clone(&self.show_success);
        let navigator = Arc::clone(&self.navigator);
        let scheduled = self
            .timers
            .schedule("hide_success", self.success_banner, move || {
                banner.store(false, Ordering::SeqCst);
            })
            .and_then(|()| {
                self.timers.schedule("redirect", self.redirect_delay, move || {
                    navigator.push(LIST_ROUTE);
                })
            });

        if let Err(e) = scheduled {
            warn!(error = %e, "no runtime for form timers; redirecting now");
            self.show_success.store(false, Ordering::SeqCst);
            self.navigator.push(LIST_ROUTE);
        }
    }

    /// Hide the submission error; the entered data stays
    pub fn dismiss_error(&mut self) {
        self.submit_error = None;
    }

    /// Reset input and errors
    pub fn reset(&mut self) {
        self.form.clear();
        self.field_errors = FieldErrors::new();
        self.submit_error = None;
    }

    /// Cancel pending redirect and banner timers (view teardown)
    pub fn teardown(&mut self) {
        self.timers.cancel_all();
    }
}
