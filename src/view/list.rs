//! Invoice list page: filters mirrored in the route, and load state

use crate::core::entity::Invoice;
use crate::core::error::ViewError;
use crate::core::filter::{InvoiceFilters, StatusFilter};
use crate::repository::InvoiceRepository;
use crate::view::Navigator;
use std::sync::Arc;
use tracing::debug;

/// What the list page should render
#[derive(Debug, Clone, PartialEq)]
pub enum ListState {
    /// The initial load has not completed; controls are disabled
    Loading,
    /// The initial load failed; offer [`InvoiceListController::retry`]
    Failed(ViewError),
    Ready {
        visible: Vec<Invoice>,
        total: usize,
    },
}

impl ListState {
    /// Invoices to render, empty unless `Ready`
    pub fn visible(&self) -> &[Invoice] {
        match self {
            ListState::Ready { visible, .. } => visible,
            _ => &[],
        }
    }

    /// Mutating controls (add, edit, delete) are only usable when ready
    pub fn controls_enabled(&self) -> bool {
        matches!(self, ListState::Ready { .. })
    }
}

pub struct InvoiceListController {
    filters: InvoiceFilters,
    navigator: Arc<dyn Navigator>,
}

impl InvoiceListController {
    /// Controller with filters read from the current query string
    pub fn from_query(query: &str, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            filters: InvoiceFilters::from_query(query),
            navigator,
        }
    }

    pub fn filters(&self) -> &InvoiceFilters {
        &self.filters
    }

    /// Replace both filters and push the matching list route
    pub fn update_filters(&mut self, search: impl Into<String>, status: StatusFilter) {
        let filters = InvoiceFilters::new(search, status);
        if filters == self.filters {
            return;
        }
        self.filters = filters;
        let route = self.filters.list_route();
        debug!(route = %route, "filters changed");
        self.navigator.push(&route);
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        let status = self.filters.status;
        self.update_filters(search, status);
    }

    pub fn set_status(&mut self, status: StatusFilter) {
        let search = self.filters.search.clone();
        self.update_filters(search, status);
    }

    pub fn clear_filters(&mut self) {
        self.update_filters(String::new(), StatusFilter::All);
    }

    /// Current page state for `repository`
    pub fn state(&self, repository: &InvoiceRepository) -> ListState {
        if repository.is_loading() {
            return ListState::Loading;
        }
        if let Some(error) = repository.error() {
            return ListState::Failed(ViewError::LoadFailed {
                message: error.to_string(),
            });
        }
        ListState::Ready {
            visible: self.filters.apply(repository.invoices()),
            total: repository.len(),
        }
    }

    /// Run the load again after a failure
    pub async fn retry(&self, repository: &mut InvoiceRepository) -> ListState {
        repository.reload().await;
        self.state(repository)
    }
}
