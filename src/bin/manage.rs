#![cfg(feature = "cli")]

use std::process::ExitCode;

use clap::{Arg, ArgMatches, arg};
use panel_dns::{
    RecordEditor, RecordForm, SaveError, SqliteConfiguration, SqliteStore,
    rr::{DomainId, RecordId},
};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match manage() {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

/// Form fields shared by `add-record` and `edit-record`.
fn record_args() -> [Arg; 11] {
    [
        arg!(--name <NAME> "Owner name, relative to the domain, fully qualified, or @"),
        arg!(--ttl <TTL> "Time to live in seconds"),
        arg!(--address <ADDRESS> "IPv4 or IPv6 address of an A or AAAA record"),
        arg!(--target <HOST> "Target of a CNAME, MX or SRV record"),
        arg!(--preference <PREFERENCE> "MX preference"),
        arg!(--text <TEXT> "Data of a TXT or SPF record"),
        arg!(--service <SERVICE> "SRV service name, e.g. _sip"),
        arg!(--protocol <PROTOCOL> "SRV protocol").value_parser(["tcp", "udp", "tls"]),
        arg!(--priority <PRIORITY> "SRV priority"),
        arg!(--weight <WEIGHT> "SRV weight"),
        arg!(--port <PORT> "SRV target port"),
    ]
}

fn manage() -> Result<(), ()> {
    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let app = clap::Command::new("panel-dns")
        .about("Manage customer DNS resource records")
        .args([arg!(--db <PATH> "Path to the panel DNS database").required(true)])
        .subcommand_required(true)
        .subcommand(clap::Command::new("init").about("Create or migrate the database"))
        .subcommand(
            clap::Command::new("add-domain")
                .about("Register a customer main domain")
                .arg(arg!(<NAME> "Domain name")),
        )
        .subcommand(
            clap::Command::new("add-alias")
                .about("Register an alias of a main domain")
                .arg(arg!(<DOMAIN_ID> "Main domain").value_parser(clap::value_parser!(i64)))
                .arg(arg!(<NAME> "Alias name"))
                .arg(arg!(--status <STATUS> "Alias status").default_value("ok")),
        )
        .subcommand(
            clap::Command::new("add-record")
                .about("Add a DNS resource record")
                .arg(arg!(<DOMAIN_ID> "Main domain").value_parser(clap::value_parser!(i64)))
                .arg(
                    arg!(--"type" <TYPE> "Record type")
                        .required(true)
                        .value_parser(["A", "AAAA", "SRV", "CNAME", "MX", "SPF", "TXT"]),
                )
                .arg(arg!(--"alias-id" <ALIAS_ID> "Alias to add the record to, 0 for the main domain").default_value("0"))
                .args(record_args()),
        )
        .subcommand(
            clap::Command::new("edit-record")
                .about("Edit a DNS resource record, keeping the values which are not given")
                .arg(arg!(<DOMAIN_ID> "Main domain").value_parser(clap::value_parser!(i64)))
                .arg(arg!(<RECORD_ID> "Record to edit").value_parser(clap::value_parser!(i64)))
                .args(record_args()),
        )
        .subcommand(
            clap::Command::new("show-record")
                .about("Show the edit form values of a DNS resource record")
                .arg(arg!(<DOMAIN_ID> "Main domain").value_parser(clap::value_parser!(i64)))
                .arg(arg!(<RECORD_ID> "Record to show").value_parser(clap::value_parser!(i64))),
        );

    let args = app.get_matches();
    let db: &String = args.get_one("db").expect("db is required");
    let store = SqliteStore::new_from_config(&SqliteConfiguration::new(db.as_str())).map_err(
        |error| {
            eprintln!("Error opening database {db}:");
            eprintln!("{error}");
        },
    )?;

    match args.subcommand() {
        Some(("init", _)) => {
            println!("Database {db} is ready");
        }
        Some(("add-domain", matches)) => {
            let name: &String = matches.get_one("NAME").expect("NAME is required");
            match store.add_domain(name) {
                Ok(id) => println!("Domain '{name}' added with id {id}"),
                Err(error) => {
                    eprintln!("Error adding domain {name}:");
                    eprintln!("{error}");
                    return Err(());
                }
            }
        }
        Some(("add-alias", matches)) => {
            let domain_id = domain_id(matches);
            let name: &String = matches.get_one("NAME").expect("NAME is required");
            let status: &String = matches.get_one("status").expect("status has a default");
            match store.add_alias(domain_id, name, status) {
                Ok(id) => println!("Alias '{name}' added with id {id}"),
                Err(error) => {
                    eprintln!("Error adding alias {name}:");
                    eprintln!("{error}");
                    return Err(());
                }
            }
        }
        Some(("add-record", matches)) => {
            let editor = RecordEditor::new(store);
            let mut form = RecordForm {
                record_type: matches
                    .get_one::<String>("type")
                    .expect("type is required")
                    .clone(),
                domain_id: matches
                    .get_one::<String>("alias-id")
                    .expect("alias-id has a default")
                    .clone(),
                ..editor.new_form()
            };
            apply_record_args(&mut form, matches);
            report(editor.save(domain_id(matches), None, &form))?;
        }
        Some(("edit-record", matches)) => {
            let editor = RecordEditor::new(store);
            let domain_id = domain_id(matches);
            let record_id = record_id(matches);
            let mut form = editor
                .edit_form(domain_id, record_id)
                .map_err(|error| report_error(&error))?;
            apply_record_args(&mut form, matches);
            report(editor.save(domain_id, Some(record_id), &form))?;
        }
        Some(("show-record", matches)) => {
            let editor = RecordEditor::new(store);
            let form = editor
                .edit_form(domain_id(matches), record_id(matches))
                .map_err(|error| report_error(&error))?
                .for_display();
            show_form(&form);
        }
        _ => unreachable!("clap crimes?"),
    }

    Ok(())
}

fn domain_id(matches: &ArgMatches) -> DomainId {
    DomainId::new(
        *matches
            .get_one::<i64>("DOMAIN_ID")
            .expect("DOMAIN_ID is required"),
    )
}

fn record_id(matches: &ArgMatches) -> RecordId {
    RecordId::new(
        *matches
            .get_one::<i64>("RECORD_ID")
            .expect("RECORD_ID is required"),
    )
}

/// Overwrite form values with the record arguments which were given.
fn apply_record_args(form: &mut RecordForm, matches: &ArgMatches) {
    let value = |id: &str| matches.get_one::<String>(id).cloned();

    if let Some(name) = value("name") {
        form.name = name;
    }
    if let Some(ttl) = value("ttl") {
        form.ttl = ttl;
    }
    if let Some(address) = value("address") {
        form.ipv4 = address.clone();
        form.ipv6 = address;
    }
    if let Some(target) = value("target") {
        form.cname = target.clone();
        form.srv_host = target;
    }
    if let Some(preference) = value("preference") {
        form.srv_prio = preference;
    }
    if let Some(text) = value("text") {
        form.txt = text;
    }
    if let Some(service) = value("service") {
        form.srv_name = service;
    }
    if let Some(protocol) = value("protocol") {
        form.srv_proto = protocol;
    }
    if let Some(priority) = value("priority") {
        form.srv_prio = priority;
    }
    if let Some(weight) = value("weight") {
        form.srv_weight = weight;
    }
    if let Some(port) = value("port") {
        form.srv_port = port;
    }
}

fn report(result: Result<panel_dns::Saved, SaveError>) -> Result<(), ()> {
    match result {
        Ok(saved) => {
            println!("{} (id {})", saved.action, saved.id);
            println!("{} IN {} {}", saved.fragment.name, saved.record_type, saved.fragment.rdata);
            Ok(())
        }
        Err(error) => {
            report_error(&error);
            Err(())
        }
    }
}

fn report_error(error: &SaveError) {
    let messages = error.user_messages();
    if messages.is_empty() {
        eprintln!("Error: {error}");
    }
    for message in messages {
        eprintln!("{message}");
    }
}

fn show_form(form: &RecordForm) {
    let fields = [
        ("type", &form.record_type),
        ("class", &form.class),
        ("name", &form.name),
        ("ttl", &form.ttl),
        ("address", &form.ipv4),
        ("address (IPv6)", &form.ipv6),
        ("canonical name", &form.cname),
        ("service", &form.srv_name),
        ("protocol", &form.srv_proto),
        ("priority", &form.srv_prio),
        ("weight", &form.srv_weight),
        ("port", &form.srv_port),
        ("host", &form.srv_host),
        ("data", &form.txt),
    ];

    for (label, value) in fields {
        if !value.is_empty() {
            println!("{label:>16}: {value}");
        }
    }
}
