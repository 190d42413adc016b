//! Lifecycle hooks around record changes
//!
//! Other panel features (billing, audit logging, ...) register listeners to be
//! told when a customer record is about to be, or has been, added or edited.
//! Listeners run inside the write transaction and cannot veto a change. They
//! are handed that transaction and must use it to reach the database.

use std::{fmt, sync::Arc};

use serde::Serialize;
use tracing::trace;

use crate::database::RecordTx;
use crate::rr::{AliasId, DomainId, RecordId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RecordEventKind {
    BeforeAdd,
    AfterAdd,
    BeforeEdit,
    AfterEdit,
}

impl RecordEventKind {
    pub fn is_before(&self) -> bool {
        matches!(self, RecordEventKind::BeforeAdd | RecordEventKind::BeforeEdit)
    }
}

impl fmt::Display for RecordEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordEventKind::BeforeAdd => "before-add",
            RecordEventKind::AfterAdd => "after-add",
            RecordEventKind::BeforeEdit => "before-edit",
            RecordEventKind::AfterEdit => "after-edit",
        };
        f.write_str(name)
    }
}

/// Payload of a record lifecycle event.
///
/// `id` is absent only before a record is added. `alias_id` is zero for
/// records of the main domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordEvent {
    pub kind: RecordEventKind,
    pub id: Option<RecordId>,
    pub domain_id: DomainId,
    pub alias_id: AliasId,
    pub name: String,
    pub class: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub data: String,
}

/// Receives record lifecycle events.
///
/// `tx` is the transaction the record is written in. Using the store itself
/// from a listener fails with [`StoreError::Reentrant`](crate::StoreError::Reentrant).
pub trait RecordListener: Send + Sync {
    fn on_event(&self, event: &RecordEvent, tx: &dyn RecordTx);
}

impl<F> RecordListener for F
where
    F: Fn(&RecordEvent, &dyn RecordTx) + Send + Sync,
{
    fn on_event(&self, event: &RecordEvent, tx: &dyn RecordTx) {
        (self)(event, tx)
    }
}

/// Fans record events out to every registered listener, in registration order.
#[derive(Clone, Default)]
pub struct EventDispatcher {
    listeners: Vec<Arc<dyn RecordListener>>,
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<L>(&mut self, listener: L)
    where
        L: RecordListener + 'static,
    {
        self.listeners.push(Arc::new(listener));
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn dispatch(&self, event: &RecordEvent, tx: &dyn RecordTx) {
        trace!(kind=%event.kind, listeners=self.listeners.len(), "dispatch record event");
        for listener in &self.listeners {
            listener.on_event(event, tx);
        }
    }
}
