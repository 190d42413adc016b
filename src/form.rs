//! Raw record form values
//!
//! [`RecordForm`] holds the strings exactly as a record add/edit form submits
//! them. Field names on the wire match the panel form (`dns_name`,
//! `dns_srv_prio`, ...), so a request body can be deserialized directly. The
//! decoder produces the same structure to pre-fill the edit form.

use serde::{Deserialize, Serialize};

use crate::rr::{DnsClass, TimeToLive, to_unicode};

/// Values of a record add/edit form.
///
/// The MX preference shares the SRV priority field, and the MX host shares
/// the SRV target host field, as on the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordForm {
    /// Record type, only read when a record is created.
    #[serde(rename = "type")]
    pub record_type: String,

    pub class: String,

    /// `0` for the main domain, otherwise the id of one of its aliases.
    /// Only read when a record is created.
    pub domain_id: String,

    #[serde(rename = "dns_name")]
    pub name: String,

    #[serde(rename = "dns_ttl")]
    pub ttl: String,

    #[serde(rename = "dns_A_address")]
    pub ipv4: String,

    #[serde(rename = "dns_AAAA_address")]
    pub ipv6: String,

    #[serde(rename = "dns_srv_name")]
    pub srv_name: String,

    #[serde(rename = "srv_proto")]
    pub srv_proto: String,

    #[serde(rename = "dns_srv_prio")]
    pub srv_prio: String,

    #[serde(rename = "dns_srv_weight")]
    pub srv_weight: String,

    #[serde(rename = "dns_srv_port")]
    pub srv_port: String,

    #[serde(rename = "dns_srv_host")]
    pub srv_host: String,

    #[serde(rename = "dns_cname")]
    pub cname: String,

    #[serde(rename = "dns_txt_data")]
    pub txt: String,
}

impl RecordForm {
    /// The values a blank form starts with.
    pub fn new() -> Self {
        RecordForm {
            class: DnsClass::IN.to_string(),
            domain_id: "0".into(),
            ttl: TimeToLive::DEFAULT.to_string(),
            srv_prio: "0".into(),
            srv_weight: "0".into(),
            ..Default::default()
        }
    }

    /// Copy of the form with surrounding whitespace removed from every value.
    pub fn cleaned(&self) -> Self {
        let clean = |value: &String| value.trim().to_owned();
        RecordForm {
            record_type: clean(&self.record_type),
            class: clean(&self.class),
            domain_id: clean(&self.domain_id),
            name: clean(&self.name),
            ttl: clean(&self.ttl),
            ipv4: clean(&self.ipv4),
            ipv6: clean(&self.ipv6),
            srv_name: clean(&self.srv_name),
            srv_proto: clean(&self.srv_proto),
            srv_prio: clean(&self.srv_prio),
            srv_weight: clean(&self.srv_weight),
            srv_port: clean(&self.srv_port),
            srv_host: clean(&self.srv_host),
            cname: clean(&self.cname),
            txt: clean(&self.txt),
        }
    }

    /// Copy of the form with stored (ASCII) names converted back to Unicode.
    ///
    /// Names keep a single trailing dot so that they are resubmitted as fully
    /// qualified names.
    pub fn for_display(&self) -> Self {
        RecordForm {
            name: display_name(&self.name),
            srv_name: to_unicode(&self.srv_name),
            srv_host: display_name(&self.srv_host),
            cname: display_name(&self.cname),
            ..self.clone()
        }
    }
}

fn display_name(name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }

    format!("{}.", to_unicode(name.trim_end_matches('.')))
}
