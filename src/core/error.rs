//! Typed error handling for invoicer
//!
//! Errors are grouped by the layer that raises them so callers can react
//! to each case specifically instead of inspecting strings.
//!
//! # Error Categories
//!
//! - [`FieldErrors`]: schema validation, one or more messages per field
//! - [`StorageError`]: reading or writing the persisted blob
//! - [`RepositoryError`]: repository operations (wraps the two above)
//! - [`ViewError`]: generic failures surfaced by view controllers
//!
//! # Example
//!
//! ```rust,ignore
//! match repository.add(draft) {
//!     Ok(invoice) => println!("created {}", invoice.number),
//!     Err(RepositoryError::Validation(errors)) => {
//!         for (field, messages) in errors.iter() {
//!             eprintln!("{field}: {}", messages.join(", "));
//!         }
//!     }
//!     Err(e) => eprintln!("{} ({})", e, e.error_code()),
//! }
//! ```

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// Validation Errors
// =============================================================================

/// Field-level validation messages keyed by field name.
///
/// Keys are the camelCase names used in the stored JSON (`dueDate`), so a
/// form binding and the persisted record agree on what a field is called.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for a field
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of failing fields
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Messages for a field, empty if the field is valid
    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Merge another set of errors into this one
    pub fn extend(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    /// `Ok(())` when no field failed
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed: ")?;
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{}: {}", field, message)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

impl From<validator::ValidationErrors> for FieldErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        for (field, errs) in errors.field_errors() {
            for err in errs {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("invalid value ({})", err.code));
                out.add(json_field_name(&field), message);
            }
        }
        out
    }
}

/// `due_date` -> `dueDate`
fn json_field_name(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors raised while reading or writing the persisted invoice blob
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The storage slot could not be read
    #[error("failed to read storage key '{key}': {message}")]
    Read { key: String, message: String },

    /// The storage slot could not be written
    #[error("failed to write storage key '{key}': {message}")]
    Write { key: String, message: String },

    /// The blob exists but is not a valid invoice collection
    #[error("stored invoices under '{key}' are corrupt: {message}")]
    Corrupt { key: String, message: String },

    /// Underlying IO failure (file backend)
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A blocking storage task panicked or was cancelled
    #[error("storage task failed: {0}")]
    Task(String),
}

impl StorageError {
    pub fn error_code(&self) -> &'static str {
        match self {
            StorageError::Read { .. } => "STORAGE_READ_ERROR",
            StorageError::Write { .. } => "STORAGE_WRITE_ERROR",
            StorageError::Corrupt { .. } => "STORAGE_CORRUPT",
            StorageError::Io(_) => "STORAGE_IO_ERROR",
            StorageError::Task(_) => "STORAGE_TASK_ERROR",
        }
    }
}

// =============================================================================
// Repository Errors
// =============================================================================

/// Errors returned by [`InvoiceRepository`](crate::repository::InvoiceRepository)
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// A mutation was attempted before the initial load finished
    #[error("invoices are still loading")]
    NotLoaded,

    /// The submitted data failed validation; nothing was changed
    #[error(transparent)]
    Validation(#[from] FieldErrors),

    /// The change is applied in memory but could not be persisted
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// No unused invoice number could be generated
    #[error("could not generate a unique invoice number after {attempts} attempts")]
    NumberExhausted { attempts: u32 },
}

impl RepositoryError {
    pub fn error_code(&self) -> &'static str {
        match self {
            RepositoryError::NotLoaded => "NOT_LOADED",
            RepositoryError::Validation(_) => "VALIDATION_ERROR",
            RepositoryError::Storage(e) => e.error_code(),
            RepositoryError::NumberExhausted { .. } => "NUMBER_EXHAUSTED",
        }
    }

    /// Field errors, if this is a validation failure
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            RepositoryError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

// =============================================================================
// View Errors
// =============================================================================

/// Error shown to the user by a view controller.
///
/// Unexpected failures are wrapped into `OperationFailed` so the view can
/// display them without inspecting the cause.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewError {
    #[error("Failed to {operation}: {message}")]
    OperationFailed { operation: String, message: String },

    /// The repository could not load persisted invoices
    #[error("Failed to load invoices: {message}")]
    LoadFailed { message: String },
}

impl ViewError {
    pub fn operation_failed(operation: &str, cause: impl fmt::Display) -> Self {
        ViewError::OperationFailed {
            operation: operation.to_string(),
            message: cause.to_string(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ViewError::OperationFailed { .. } => "OPERATION_FAILED",
            ViewError::LoadFailed { .. } => "LOAD_FAILED",
        }
    }
}
