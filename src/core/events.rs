//! Change notifications for the invoice collection
//!
//! The repository publishes an [`InvoiceEvent`] after every successful
//! mutation. Views that mirror the collection (e.g. a second list open on the
//! same store) subscribe instead of polling.
//!
//! # Usage
//!
//! ```rust,ignore
//! let bus = EventBus::new(64);
//! let mut rx = bus.subscribe();
//! let mut repository = InvoiceRepository::open(store).await.with_events(bus.clone());
//!
//! repository.add(draft)?;
//! if let Ok(envelope) = rx.recv().await {
//!     println!("{} {}", envelope.event.action(), envelope.event.invoice_id());
//! }
//! ```

use crate::core::entity::Invoice;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// A mutation of the invoice collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum InvoiceEvent {
    Created { invoice: Invoice },
    Updated { invoice: Invoice },
    Deleted { invoice_id: Uuid, number: String },
}

impl InvoiceEvent {
    pub fn invoice_id(&self) -> Uuid {
        match self {
            InvoiceEvent::Created { invoice } | InvoiceEvent::Updated { invoice } => invoice.id,
            InvoiceEvent::Deleted { invoice_id, .. } => *invoice_id,
        }
    }

    /// Action name (created, updated, deleted)
    pub fn action(&self) -> &'static str {
        match self {
            InvoiceEvent::Created { .. } => "created",
            InvoiceEvent::Updated { .. } => "updated",
            InvoiceEvent::Deleted { .. } => "deleted",
        }
    }
}

/// Event with publication metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub event: InvoiceEvent,
}

impl EventEnvelope {
    pub fn new(event: InvoiceEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// Broadcast bus for invoice events.
///
/// Cheap to clone. Publishing never blocks; subscribers that fall more than
/// `capacity` events behind get `Lagged` on their next `recv()`.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish to all current subscribers, returning how many will receive it
    pub fn publish(&self, event: InvoiceEvent) -> usize {
        // send() only fails when nobody is subscribed
        self.sender.send(EventEnvelope::new(event)).unwrap_or(0)
    }

    /// Receive events published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
