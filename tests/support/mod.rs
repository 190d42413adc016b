#![allow(unused)]

use std::sync::{Arc, Mutex, Once};

use panel_dns::rr::{AliasId, DomainId};
use panel_dns::{
    RecordEditor, RecordEvent, RecordEventKind, RecordForm, RecordListener, RecordTx,
    SqliteStore,
};

/// Registers a global default tracing subscriber when called for the first time. This is intended
/// for use in tests.
pub fn subscribe() {
    static INSTALL_TRACING_SUBSCRIBER: Once = Once::new();
    INSTALL_TRACING_SUBSCRIBER.call_once(|| {
        let subscriber = tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .finish();
        tracing::subscriber::set_global_default(subscriber).unwrap();
    });
}

/// Records every event it receives.
#[derive(Debug, Clone, Default)]
pub struct RecordingListener {
    events: Arc<Mutex<Vec<RecordEvent>>>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RecordEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn kinds(&self) -> Vec<RecordEventKind> {
        self.events().into_iter().map(|event| event.kind).collect()
    }
}

impl RecordListener for RecordingListener {
    fn on_event(&self, event: &RecordEvent, _: &dyn RecordTx) {
        self.events.lock().unwrap().push(event.clone());
    }
}

/// A customer with the main domain `example.com` and two aliases: `example.net`
/// (active) and `example.org` (still being ordered).
pub struct Customer {
    pub domain_id: DomainId,
    pub alias_id: AliasId,
    pub ordered_alias_id: AliasId,
}

pub fn customer(store: &SqliteStore) -> Customer {
    let domain_id = store.add_domain("example.com").unwrap();
    let alias_id = store.add_alias(domain_id, "example.net", "ok").unwrap();
    let ordered_alias_id = store.add_alias(domain_id, "example.org", "ordered").unwrap();

    Customer {
        domain_id,
        alias_id,
        ordered_alias_id,
    }
}

/// An editor over an in-memory store, with a listener attached.
pub fn editor() -> (RecordEditor<SqliteStore>, Customer, RecordingListener) {
    let store = SqliteStore::new_in_memory().unwrap();
    let customer = customer(&store);

    let listener = RecordingListener::new();
    let mut editor = RecordEditor::new(store);
    editor.events_mut().register(listener.clone());

    (editor, customer, listener)
}

/// A blank add form for a record of `record_type` named `name`.
pub fn form(record_type: &str, name: &str) -> RecordForm {
    RecordForm {
        record_type: record_type.into(),
        name: name.into(),
        ..RecordForm::new()
    }
}
