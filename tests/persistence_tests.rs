use camino::Utf8PathBuf;
use panel_dns::database::NewRecord;
use panel_dns::rr::{AliasId, DomainId, RecordId, RecordStatus};
use panel_dns::{RecordEditor, RecordStore as _, SqliteConfiguration, SqliteStore, StoreError};

mod support;
use support::{customer, form, subscribe};

fn www(domain_id: DomainId) -> NewRecord {
    NewRecord {
        domain_id,
        alias_id: AliasId::new(0),
        name: "www.example.com.\t3600".into(),
        class: "IN".into(),
        record_type: "A".into(),
        rdata: "192.0.2.10".into(),
    }
}

fn database() -> (tempfile::TempDir, SqliteConfiguration) {
    let dir = tempfile::tempdir().unwrap();
    let path = Utf8PathBuf::from_path_buf(dir.path().join("panel.sqlite")).unwrap();
    (dir, SqliteConfiguration::new(path))
}

#[test]
fn records_survive_reopening() {
    subscribe();
    let (_dir, config) = database();

    let (domain_id, record_id) = {
        let store = SqliteStore::new_from_config(&config).unwrap();
        let customer = customer(&store);
        let editor = RecordEditor::new(store);
        let saved = editor
            .save(
                customer.domain_id,
                None,
                &panel_dns::RecordForm {
                    txt: "v=spf1 mx -all".into(),
                    ..form("SPF", "@")
                },
            )
            .unwrap();
        (customer.domain_id, saved.id)
    };

    let store = SqliteStore::new_from_config(&config).unwrap();
    let stored = store.record(domain_id, record_id).unwrap().unwrap();
    assert_eq!(stored.record.name, "example.com.\t3600");
    assert_eq!(stored.record.record_type, "SPF");
    assert_eq!(stored.record.rdata, "\"v=spf1 mx -all\"");
    assert_eq!(stored.record.status, RecordStatus::ToAdd);

    let domains = store.domains(domain_id).unwrap();
    assert_eq!(domains.len(), 2);
    assert_eq!(domains[0].id, AliasId::new(0));
}

#[test]
fn configuration_from_json() {
    subscribe();
    let (dir, _) = database();
    let path = dir.path().join("from-json.sqlite");

    let config: SqliteConfiguration =
        serde_json::from_value(serde_json::json!({ "path": path.to_str().unwrap() })).unwrap();
    let store = SqliteStore::new_from_config(&config).unwrap();
    store.add_domain("example.com").unwrap();
    assert!(path.exists());

    let config: SqliteConfiguration = serde_json::from_str("{}").unwrap();
    let store = SqliteStore::new_from_config(&config).unwrap();
    assert!(store.main_domain(DomainId::new(1)).unwrap().is_none());
}

#[test]
fn domain_names_are_normalized() {
    subscribe();
    let store = SqliteStore::new_in_memory().unwrap();

    let id = store.add_domain("Bücher.Example.").unwrap();
    let domain = store.main_domain(id).unwrap().unwrap();
    assert_eq!(domain.name, "xn--bcher-kva.example");
    assert_eq!(domain.status, "ok");

    assert!(matches!(
        store.add_domain("xn--bcher-kva.example"),
        Err(StoreError::Duplicate)
    ));
}

#[test]
fn aliases_belong_to_their_domain() {
    subscribe();
    let store = SqliteStore::new_in_memory().unwrap();
    let customer = customer(&store);
    let other = store.add_domain("example.info").unwrap();

    let alias = store
        .alias(customer.domain_id, customer.alias_id)
        .unwrap()
        .unwrap();
    assert_eq!(alias.name, "example.net");
    assert_eq!(alias.domain_id, customer.domain_id);

    assert!(store.alias(other, customer.alias_id).unwrap().is_none());
    assert!(store.domains(other).unwrap().iter().all(|d| d.id.is_zero()));
}

#[test]
fn failed_transactions_roll_back() {
    subscribe();
    let store = SqliteStore::new_in_memory().unwrap();
    let customer = customer(&store);

    let record = www(customer.domain_id);

    let result: Result<(), StoreError> = store.transaction(|tx| {
        tx.insert(&record)?;
        tx.insert(&record)?;
        Ok(())
    });
    assert!(matches!(result, Err(StoreError::Duplicate)));

    let id = store.transaction(|tx| tx.insert(&record)).unwrap();
    assert_eq!(id.get(), 1, "the first insert was rolled back");
}

#[test]
fn updates_require_a_customer_record() {
    subscribe();
    let store = SqliteStore::new_in_memory().unwrap();
    let customer = customer(&store);
    let other = store.add_domain("example.info").unwrap();

    let record = www(customer.domain_id);
    let id = store.transaction(|tx| tx.insert(&record)).unwrap();

    let missing = RecordId::new(99);
    let result = store.transaction(|tx| tx.update(missing, &record));
    assert!(matches!(result, Err(StoreError::UnknownRecord(gone)) if gone == missing));

    let result = store.transaction(|tx| tx.update(id, &www(other)));
    assert!(
        matches!(result, Err(StoreError::UnknownRecord(_))),
        "records of another customer are left alone"
    );

    store
        .set_status(id, &RecordStatus::Ok)
        .unwrap();
    let updated = NewRecord {
        rdata: "192.0.2.11".into(),
        ..record
    };
    store.transaction(|tx| tx.update(id, &updated)).unwrap();

    let stored = store.record(customer.domain_id, id).unwrap().unwrap();
    assert_eq!(stored.record.rdata, "192.0.2.11");
    assert_eq!(stored.record.status, RecordStatus::ToChange);
}
