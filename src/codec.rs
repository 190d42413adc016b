//! Zone fragment codec
//!
//! A record is stored as a zone fragment: an owner column holding the dot
//! terminated name, a tab and the TTL (`www.example.com.\t3600`), and a data
//! column holding the type specific presentation of the record data.
//!
//! The encoder turns a [`ValidatedRecord`] into that pair. The decoder does the
//! reverse for the edit form. Decoding is best effort: fields which cannot be
//! recovered from a malformed fragment are left at their defaults.
//!
//! The decoder assumes the exact layout written by the encoder. In particular
//! the SRV weight and port are separated by a single whitespace character; any
//! other layout decodes to default values rather than an error.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::form::RecordForm;
use crate::rr::{DnsClass, OwnerTag, RawRecord, RecordStatus, RecordType};
use crate::validate::{RecordData, ValidatedRecord};

/// The stored `(name, rdata)` pair of a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZoneFragment {
    pub name: String,
    pub rdata: String,
}

impl ZoneFragment {
    /// A new record row for this fragment, as written by the record editor.
    pub fn to_raw_record(&self, record_type: RecordType) -> RawRecord {
        RawRecord {
            name: self.name.clone(),
            rdata: self.rdata.clone(),
            class: DnsClass::IN.to_string(),
            record_type: record_type.to_string(),
            owner: OwnerTag::custom_dns(),
            status: RecordStatus::ToAdd,
        }
    }
}

impl fmt::Display for ZoneFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.name, self.rdata)
    }
}

impl ValidatedRecord {
    /// Encode the record into its stored zone fragment.
    pub fn encode(&self) -> ZoneFragment {
        let rdata = match self.data() {
            RecordData::A(address) => address.to_string(),
            RecordData::AAAA(address) => address.to_string(),
            RecordData::CNAME(target) => target.to_ascii(),
            RecordData::MX {
                preference,
                exchange,
            } => format!("{preference} {}", exchange.to_ascii()),
            RecordData::TXT(text) | RecordData::SPF(text) => format!("\"{text}\""),
            RecordData::SRV(srv) => format!(
                "{} {} {} {}",
                srv.priority,
                srv.weight,
                srv.port,
                srv.target.to_ascii()
            ),
        };

        ZoneFragment {
            name: format!("{}\t{}", self.owner().to_ascii(), self.ttl()),
            rdata,
        }
    }
}

/// Decode a stored record into the values of its edit form.
///
/// Records of a type the editor does not manage are decoded like TXT records.
pub fn decode(record: &RawRecord) -> RecordForm {
    let mut form = RecordForm {
        record_type: record.record_type.clone(),
        class: record.class.clone(),
        ..RecordForm::new()
    };

    let kind = record.kind().ok();
    if kind == Some(RecordType::SRV) {
        if let Some(owner) = scan_srv_owner(&record.name) {
            form.srv_name = owner.service.into();
            form.srv_proto = owner.protocol.trim_start_matches('_').into();
            form.name = owner.name.into();
            form.ttl = owner.ttl.into();
        } else {
            trace!(name = %record.name, "SRV owner does not match the stored layout");
        }
    } else if let Some((name, ttl)) = scan_owner(&record.name) {
        form.name = name.into();
        if let Some(ttl) = ttl {
            form.ttl = ttl.into();
        }
    }

    match kind {
        Some(RecordType::A) => form.ipv4 = record.rdata.clone(),
        Some(RecordType::AAAA) => form.ipv6 = record.rdata.clone(),
        Some(RecordType::CNAME) => form.cname = record.rdata.clone(),
        Some(RecordType::MX) => {
            if let Some((preference, host)) = scan_mx(&record.rdata) {
                form.srv_prio = preference.into();
                form.srv_host = host.into();
            }
        }
        Some(RecordType::SRV) => {
            if let Some(target) = scan_srv_target(&record.rdata) {
                form.srv_prio = target.priority.into();
                form.srv_weight = target.weight.into();
                form.srv_port = target.port.into();
                form.srv_host = target.host.into();
            } else {
                trace!(rdata = %record.rdata, "SRV data does not match the stored layout");
            }
        }
        Some(RecordType::TXT) | Some(RecordType::SPF) | None => form.txt = record.rdata.clone(),
    }

    form
}

/// `<name>[ <ttl>]`
fn scan_owner(input: &str) -> Option<(&str, Option<&str>)> {
    let mut scanner = Scanner::new(input);
    let name = scanner.token()?;

    let ttl = scanner.attempt(|s| {
        s.spaces()?;
        s.digits()
    });

    Some((name, ttl))
}

struct SrvOwner<'a> {
    service: &'a str,
    protocol: &'a str,
    name: &'a str,
    ttl: &'a str,
}

/// `_<service>._<proto>.<name> <ttl>`
fn scan_srv_owner(input: &str) -> Option<SrvOwner<'_>> {
    let mut scanner = Scanner::new(input);
    let service = scanner.underscore_label()?;
    scanner.literal('.')?;
    let protocol = scanner.underscore_label()?;
    scanner.literal('.')?;
    let name = scanner.token()?;
    scanner.spaces()?;
    let ttl = scanner.digits()?;

    Some(SrvOwner {
        service,
        protocol,
        name,
        ttl,
    })
}

/// `<preference> <host>`
fn scan_mx(input: &str) -> Option<(&str, &str)> {
    let mut scanner = Scanner::new(input);
    let preference = scanner.digits()?;
    scanner.spaces()?;
    let host = scanner.token()?;
    Some((preference, host))
}

struct SrvTarget<'a> {
    priority: &'a str,
    weight: &'a str,
    port: &'a str,
    host: &'a str,
}

/// `<priority> <weight> <port> <host>`, with a single separator before the port
fn scan_srv_target(input: &str) -> Option<SrvTarget<'_>> {
    let mut scanner = Scanner::new(input);
    let priority = scanner.digits()?;
    scanner.spaces()?;
    let weight = scanner.digits()?;
    scanner.space()?;
    let port = scanner.digits()?;
    scanner.spaces()?;
    let host = scanner.token()?;

    Some(SrvTarget {
        priority,
        weight,
        port,
        host,
    })
}

/// Whitespace as understood by the stored layout, including vertical tab.
fn is_space(c: char) -> bool {
    c.is_ascii_whitespace() || c == '\x0B'
}

/// Anchored, left to right scanner over a stored column.
///
/// Every step consumes the longest run it accepts and returns `None` when it
/// accepts nothing. Trailing input is ignored.
#[derive(Debug, Clone, Copy)]
struct Scanner<'a> {
    rest: &'a str,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Scanner { rest: input }
    }

    fn take_while(&mut self, accept: impl Fn(char) -> bool) -> Option<&'a str> {
        let end = self
            .rest
            .char_indices()
            .find(|&(_, c)| !accept(c))
            .map_or(self.rest.len(), |(idx, _)| idx);

        if end == 0 {
            return None;
        }

        let (taken, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(taken)
    }

    /// Run `step` on a copy of the scanner, keeping its progress only when it
    /// succeeds.
    fn attempt<T>(&mut self, step: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let mut fork = *self;
        let value = step(&mut fork)?;
        *self = fork;
        Some(value)
    }

    fn token(&mut self) -> Option<&'a str> {
        self.take_while(|c| !is_space(c))
    }

    fn digits(&mut self) -> Option<&'a str> {
        self.take_while(|c| c.is_ascii_digit())
    }

    fn spaces(&mut self) -> Option<()> {
        self.take_while(is_space).map(|_| ())
    }

    fn space(&mut self) -> Option<()> {
        let c = self.rest.chars().next().filter(|&c| is_space(c))?;
        self.rest = &self.rest[c.len_utf8()..];
        Some(())
    }

    fn literal(&mut self, expected: char) -> Option<()> {
        self.rest = self.rest.strip_prefix(expected)?;
        Some(())
    }

    /// An underscore followed by at least one character which is neither
    /// whitespace nor a dot.
    fn underscore_label(&mut self) -> Option<&'a str> {
        let start = self.rest;
        self.literal('_')?;
        let label = self.take_while(|c| c != '.' && !is_space(c))?;
        Some(&start[..label.len() + 1])
    }
}
