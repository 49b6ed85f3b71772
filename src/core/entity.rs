//! Invoice entity and the shapes used to create and modify it

use crate::core::dates;
use crate::core::error::FieldErrors;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Payment status of an invoice.
///
/// The set is closed: any other value is rejected at deserialization and
/// parsing time, so an `Invoice` can never carry an unknown status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvoiceStatus {
    Paid,
    Unpaid,
    Pending,
}

impl InvoiceStatus {
    /// All statuses, in the order they are offered to users
    pub const ALL: [InvoiceStatus; 3] = [
        InvoiceStatus::Paid,
        InvoiceStatus::Unpaid,
        InvoiceStatus::Pending,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Paid => "Paid",
            InvoiceStatus::Unpaid => "Unpaid",
            InvoiceStatus::Pending => "Pending",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the invoice statuses
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid invoice status: '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for InvoiceStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// A persisted invoice.
///
/// `id`, `number` and `created_at` are assigned by the repository when the
/// invoice is created and never change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Uuid,
    pub name: String,
    pub number: String,
    #[serde(with = "dates::calendar_date")]
    pub due_date: NaiveDate,
    pub amount: f64,
    pub status: InvoiceStatus,
    #[serde(with = "dates::timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Invoice {
    /// Build an invoice from a validated draft and repository-assigned metadata
    pub(crate) fn from_draft(
        draft: InvoiceDraft,
        number: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: draft.name,
            number,
            due_date: draft.due_date,
            amount: draft.amount,
            status: draft.status,
            created_at,
        }
    }

    /// The caller-editable part of this invoice
    pub fn to_draft(&self) -> InvoiceDraft {
        InvoiceDraft {
            name: self.name.clone(),
            due_date: self.due_date,
            amount: self.amount,
            status: self.status,
        }
    }

    /// Apply a patch, returning the merged invoice without modifying `self`.
    ///
    /// The merged editable fields are validated; immutable fields are kept.
    pub fn merged(&self, patch: &InvoicePatch) -> Result<Invoice, FieldErrors> {
        let mut draft = self.to_draft();
        if let Some(name) = &patch.name {
            draft.name = name.clone();
        }
        if let Some(due_date) = patch.due_date {
            draft.due_date = due_date;
        }
        if let Some(amount) = patch.amount {
            draft.amount = amount;
        }
        if let Some(status) = patch.status {
            draft.status = status;
        }
        draft.check()?;

        Ok(Invoice {
            name: draft.name,
            due_date: draft.due_date,
            amount: draft.amount,
            status: draft.status,
            ..self.clone()
        })
    }
}

/// Caller-supplied fields of a new invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDraft {
    #[validate(length(max = 100, message = "Invoice name must be less than 100 characters"))]
    pub name: String,

    #[serde(with = "dates::calendar_date")]
    pub due_date: NaiveDate,

    #[validate(range(min = 0.0, message = "Amount must be greater than or equal to 0"))]
    pub amount: f64,

    pub status: InvoiceStatus,
}

impl InvoiceDraft {
    pub fn new(
        name: impl Into<String>,
        due_date: NaiveDate,
        amount: f64,
        status: InvoiceStatus,
    ) -> Self {
        Self {
            name: name.into(),
            due_date,
            amount,
            status,
        }
    }

    /// Run the schema rules, collecting messages per field.
    ///
    /// Messages match the form's wording. `validator`'s range check lets NaN
    /// through, so finiteness is checked here as well.
    pub fn check(&self) -> Result<(), FieldErrors> {
        let mut errors = match self.validate() {
            Ok(()) => FieldErrors::default(),
            Err(e) => FieldErrors::from(e),
        };
        if self.name.is_empty() {
            errors.add("name", "Invoice name is required");
        }
        if !self.amount.is_finite() {
            errors.add("amount", "Amount must be a number");
        }
        errors.into_result()
    }
}

/// Partial update of an invoice's editable fields.
///
/// There is no way to express a change to `id`, `number` or `created_at`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoicePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "dates::optional_calendar_date"
    )]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<InvoiceStatus>,
}

impl InvoicePatch {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn status(mut self, status: InvoiceStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// True when the patch would not change anything
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.due_date.is_none()
            && self.amount.is_none()
            && self.status.is_none()
    }
}

/// Patch replacing every editable field (edit form submission)
impl From<InvoiceDraft> for InvoicePatch {
    fn from(draft: InvoiceDraft) -> Self {
        InvoicePatch {
            name: Some(draft.name),
            due_date: Some(draft.due_date),
            amount: Some(draft.amount),
            status: Some(draft.status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Invoice {
        Invoice::from_draft(
            InvoiceDraft::new("Acme", date(2025, 1, 15), 500.0, InvoiceStatus::Pending),
            "INV123456789".to_string(),
            Utc::now(),
        )
    }

    #[test]
    fn test_status_parse_and_display() {
        for status in InvoiceStatus::ALL {
            assert_eq!(status.to_string().parse::<InvoiceStatus>(), Ok(status));
        }
        assert!("paid".parse::<InvoiceStatus>().is_err());
        assert!("Overdue".parse::<InvoiceStatus>().is_err());
    }

    #[test]
    fn test_status_rejects_unknown_json() {
        let result: Result<InvoiceStatus, _> = serde_json::from_value(json!("Cancelled"));
        assert!(result.is_err());
    }

    #[test]
    fn test_invoice_serializes_camel_case() {
        let invoice = sample();
        let value = serde_json::to_value(&invoice).unwrap();
        assert_eq!(value["dueDate"], json!("2025-01-15"));
        assert_eq!(value["status"], json!("Pending"));
        assert!(value["createdAt"].is_string());
        assert!(value.get("due_date").is_none());
    }

    #[test]
    fn test_draft_check_accepts_zero_amount() {
        let draft = InvoiceDraft::new("Zero", date(2025, 1, 1), 0.0, InvoiceStatus::Paid);
        assert!(draft.check().is_ok());
    }

    #[test]
    fn test_draft_check_reports_each_field() {
        let draft = InvoiceDraft::new("", date(2025, 1, 1), -1.0, InvoiceStatus::Paid);
        let errors = draft.check().unwrap_err();
        assert_eq!(errors.messages("name"), ["Invoice name is required"]);
        assert!(errors.contains("amount"));
        assert!(!errors.contains("status"));
    }

    #[test]
    fn test_draft_check_rejects_long_name_and_nan() {
        let draft = InvoiceDraft::new("x".repeat(101), date(2025, 1, 1), f64::NAN, InvoiceStatus::Paid);
        let errors = draft.check().unwrap_err();
        assert_eq!(
            errors.messages("name"),
            ["Invoice name must be less than 100 characters"]
        );
        assert_eq!(errors.messages("amount"), ["Amount must be a number"]);

        let exact = InvoiceDraft::new("x".repeat(100), date(2025, 1, 1), 1.0, InvoiceStatus::Paid);
        assert!(exact.check().is_ok());
    }

    #[test]
    fn test_merged_keeps_immutable_fields() {
        let invoice = sample();
        let merged = invoice
            .merged(&InvoicePatch::default().name("Globex").status(InvoiceStatus::Paid))
            .unwrap();

        assert_eq!(merged.id, invoice.id);
        assert_eq!(merged.number, invoice.number);
        assert_eq!(merged.created_at, invoice.created_at);
        assert_eq!(merged.name, "Globex");
        assert_eq!(merged.status, InvoiceStatus::Paid);
        assert_eq!(merged.amount, invoice.amount);
    }

    #[test]
    fn test_merged_validates_result() {
        let invoice = sample();
        let errors = invoice.merged(&InvoicePatch::default().amount(-5.0)).unwrap_err();
        assert!(errors.contains("amount"));
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(InvoicePatch::default().is_empty());
        assert!(!InvoicePatch::default().amount(1.0).is_empty());
    }

    #[test]
    fn test_patch_deserializes_partial_json() {
        let patch: InvoicePatch =
            serde_json::from_value(json!({"status": "Paid", "dueDate": "2025-02-01"})).unwrap();
        assert_eq!(patch.status, Some(InvoiceStatus::Paid));
        assert_eq!(patch.due_date, Some(date(2025, 2, 1)));
        assert!(patch.name.is_none());
    }
}
