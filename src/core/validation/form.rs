//! Raw invoice form input and its conversion into a typed draft

use crate::core::dates;
use crate::core::entity::{Invoice, InvoiceDraft, InvoiceStatus};
use crate::core::error::FieldErrors;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Maximum invoice name length, in characters
pub const NAME_MAX_CHARS: usize = 100;

/// Values as typed into the invoice form.
///
/// Every field may be missing or malformed; [`InvoiceForm::to_draft`]
/// turns it into an [`InvoiceDraft`] or field-level messages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct InvoiceForm {
    pub name: String,

    #[validate(required(message = "Due date is required"))]
    pub due_date: Option<String>,

    #[validate(required(message = "Amount is required"))]
    pub amount: Option<String>,

    #[validate(required(message = "Status is required"))]
    pub status: Option<String>,
}

impl InvoiceForm {
    pub fn new(
        name: impl Into<String>,
        due_date: impl Into<String>,
        amount: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            due_date: Some(due_date.into()),
            amount: Some(amount.into()),
            status: Some(status.into()),
        }
    }

    /// Prefill the form from an existing invoice (edit page)
    pub fn from_invoice(invoice: &Invoice) -> Self {
        Self {
            name: invoice.name.clone(),
            due_date: Some(invoice.due_date.format("%Y-%m-%d").to_string()),
            amount: Some(invoice.amount.to_string()),
            status: Some(invoice.status.to_string()),
        }
    }

    /// Validate every field and build the typed draft.
    ///
    /// All failing fields are reported at once.
    pub fn to_draft(&self) -> Result<InvoiceDraft, FieldErrors> {
        let mut errors = match self.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => FieldErrors::from(e),
        };

        let name_len = self.name.chars().count();
        if name_len == 0 {
            errors.add("name", "Invoice name is required");
        } else if name_len > NAME_MAX_CHARS {
            errors.add("name", "Invoice name must be less than 100 characters");
        }

        let due_date = match present(&self.due_date) {
            Some(text) => {
                let parsed = dates::parse_date(text);
                if parsed.is_none() {
                    errors.add("dueDate", "Due date must be a valid date");
                }
                parsed
            }
            None => {
                blank_as_missing(&mut errors, &self.due_date, "dueDate", "Due date is required");
                None
            }
        };

        let amount = match present(&self.amount) {
            Some(text) => match text.parse::<f64>() {
                Ok(value) if !value.is_finite() => {
                    errors.add("amount", "Amount must be a number");
                    None
                }
                Ok(value) if value < 0.0 => {
                    errors.add("amount", "Amount must be greater than or equal to 0");
                    None
                }
                Ok(value) => Some(value),
                Err(_) => {
                    errors.add("amount", "Amount must be a number");
                    None
                }
            },
            None => {
                blank_as_missing(&mut errors, &self.amount, "amount", "Amount is required");
                None
            }
        };

        let status = match present(&self.status) {
            Some(text) => {
                let parsed = text.parse::<InvoiceStatus>().ok();
                if parsed.is_none() {
                    errors.add("status", "Invalid status selected");
                }
                parsed
            }
            None => {
                blank_as_missing(&mut errors, &self.status, "status", "Status is required");
                None
            }
        };

        match (due_date, amount, status) {
            (Some(due_date), Some(amount), Some(status)) if errors.is_empty() => {
                let draft = InvoiceDraft::new(self.name.clone(), due_date, amount, status);
                draft.check()?;
                Ok(draft)
            }
            _ => Err(errors),
        }
    }

    /// Reset every field to its empty default
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// `Some` with non-blank content
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// `validator`'s `required` only catches `None`; a blank input is missing too
fn blank_as_missing(errors: &mut FieldErrors, value: &Option<String>, field: &str, message: &str) {
    if value.is_some() {
        errors.add(field, message);
    }
}
