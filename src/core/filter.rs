//! Search and status filtering of invoice lists
//!
//! [`filter_invoices`] is the pure predicate behind the list view.
//! [`InvoiceFilters`] is the filter state as it travels in the list page's
//! query string.
//!
//! # Example
//! ```rust,ignore
//! // /invoices/list?search=acme&status=Paid
//! let filters = InvoiceFilters::from_query("search=acme&status=Paid");
//! let visible = filters.apply(repository.invoices());
//! ```

use crate::core::entity::{Invoice, InvoiceStatus};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::form_urlencoded;

/// Route of the invoice list page
pub const LIST_ROUTE: &str = "/invoices/list";

/// Label of the "no status filter" option
pub const ALL_STATUS: &str = "All Status";

/// Status selector of the list view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StatusFilter {
    /// Matches every invoice
    #[default]
    All,
    /// Matches invoices with exactly this status
    Only(InvoiceStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: InvoiceStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, StatusFilter::All)
    }

    /// Selector options in display order, "All Status" first
    pub fn options() -> Vec<StatusFilter> {
        std::iter::once(StatusFilter::All)
            .chain(InvoiceStatus::ALL.into_iter().map(StatusFilter::Only))
            .collect()
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str(ALL_STATUS),
            StatusFilter::Only(status) => write!(f, "{}", status),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = crate::core::entity::UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ALL_STATUS {
            Ok(StatusFilter::All)
        } else {
            s.parse().map(StatusFilter::Only)
        }
    }
}

impl From<InvoiceStatus> for StatusFilter {
    fn from(status: InvoiceStatus) -> Self {
        StatusFilter::Only(status)
    }
}

impl Serialize for StatusFilter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for StatusFilter {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// True if `invoice` passes both the search text and the status selector.
///
/// Search is a case-insensitive substring match on `name` or `number`;
/// an empty search matches everything.
pub fn matches(invoice: &Invoice, search: &str, status: &StatusFilter) -> bool {
    if !status.matches(invoice.status) {
        return false;
    }
    if search.is_empty() {
        return true;
    }
    let needle = search.to_lowercase();
    invoice.name.to_lowercase().contains(&needle) || invoice.number.to_lowercase().contains(&needle)
}

/// Visible subset of `invoices`, in input order
pub fn filter_invoices(invoices: &[Invoice], search: &str, status: &StatusFilter) -> Vec<Invoice> {
    invoices
        .iter()
        .filter(|invoice| matches(invoice, search, status))
        .cloned()
        .collect()
}

/// Filter state of the list page, mirrored in its query string
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceFilters {
    pub search: String,
    pub status: StatusFilter,
}

impl InvoiceFilters {
    pub fn new(search: impl Into<String>, status: StatusFilter) -> Self {
        Self {
            search: search.into(),
            status,
        }
    }

    /// Read `search` and `status` from a query string (leading `?` allowed).
    ///
    /// Missing parameters fall back to the defaults; an unknown status is
    /// treated as "All Status".
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut filters = Self::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "search" => filters.search = value.into_owned(),
                "status" => filters.status = value.parse().unwrap_or_default(),
                _ => {}
            }
        }
        filters
    }

    /// Encode as a query string, omitting defaults
    pub fn to_query(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        if !self.search.is_empty() {
            serializer.append_pair("search", &self.search);
        }
        if let StatusFilter::Only(status) = self.status {
            serializer.append_pair("status", status.as_str());
        }
        serializer.finish()
    }

    /// List page route carrying these filters
    pub fn list_route(&self) -> String {
        let query = self.to_query();
        if query.is_empty() {
            LIST_ROUTE.to_string()
        } else {
            format!("{}?{}", LIST_ROUTE, query)
        }
    }

    /// True when any filter differs from its default
    pub fn is_active(&self) -> bool {
        !self.search.is_empty() || !self.status.is_all()
    }

    pub fn apply(&self, invoices: &[Invoice]) -> Vec<Invoice> {
        filter_invoices(invoices, &self.search, &self.status)
    }
}
