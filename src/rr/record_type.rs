use std::{fmt, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// The record types a customer may manage through the panel.
///
/// TXT and SPF share their validation and encoding rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RecordType {
    A,
    AAAA,
    CNAME,
    MX,
    TXT,
    SPF,
    SRV,
}

impl RecordType {
    /// Every supported type, in the order offered by the add form.
    pub const ALL: [RecordType; 7] = [
        RecordType::A,
        RecordType::AAAA,
        RecordType::SRV,
        RecordType::CNAME,
        RecordType::MX,
        RecordType::SPF,
        RecordType::TXT,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::AAAA => "AAAA",
            RecordType::CNAME => "CNAME",
            RecordType::MX => "MX",
            RecordType::TXT => "TXT",
            RecordType::SPF => "SPF",
            RecordType::SRV => "SRV",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordType::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| ProtocolError::UnsupportedType(s.to_owned()))
    }
}

impl TryFrom<String> for RecordType {
    type Error = ProtocolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RecordType> for String {
    fn from(value: RecordType) -> Self {
        value.as_str().to_owned()
    }
}

impl From<RecordType> for hickory_proto::rr::RecordType {
    fn from(value: RecordType) -> Self {
        match value {
            RecordType::A => hickory_proto::rr::RecordType::A,
            RecordType::AAAA => hickory_proto::rr::RecordType::AAAA,
            RecordType::CNAME => hickory_proto::rr::RecordType::CNAME,
            RecordType::MX => hickory_proto::rr::RecordType::MX,
            RecordType::TXT => hickory_proto::rr::RecordType::TXT,
            // RFC 7208 retired the SPF type, hickory only knows its code.
            RecordType::SPF => hickory_proto::rr::RecordType::Unknown(99),
            RecordType::SRV => hickory_proto::rr::RecordType::SRV,
        }
    }
}

impl ToSql for RecordType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for RecordType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(FromSqlError::other)
    }
}

/// DNS class of a customer record. Only `IN` is accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DnsClass {
    #[default]
    IN,
}

impl DnsClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            DnsClass::IN => "IN",
        }
    }
}

impl fmt::Display for DnsClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DnsClass {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IN" => Ok(DnsClass::IN),
            _ => Err(ProtocolError::UnsupportedClass(s.to_owned())),
        }
    }
}

impl From<DnsClass> for hickory_proto::rr::DNSClass {
    fn from(value: DnsClass) -> Self {
        match value {
            DnsClass::IN => hickory_proto::rr::DNSClass::IN,
        }
    }
}

impl ToSql for DnsClass {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

/// Transport protocol of an SRV record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SrvProtocol {
    Udp,
    Tcp,
    Tls,
}

impl SrvProtocol {
    /// Protocols in the order offered by the form.
    pub const ALL: [SrvProtocol; 3] = [SrvProtocol::Tcp, SrvProtocol::Udp, SrvProtocol::Tls];

    pub fn as_str(&self) -> &'static str {
        match self {
            SrvProtocol::Udp => "udp",
            SrvProtocol::Tcp => "tcp",
            SrvProtocol::Tls => "tls",
        }
    }

    /// Owner name label of the protocol, e.g. `_tcp`.
    pub fn label(&self) -> String {
        format!("_{}", self.as_str())
    }
}

impl fmt::Display for SrvProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts the form value (`tcp`) as well as the owner label (`_tcp`).
impl FromStr for SrvProtocol {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bare = s.strip_prefix('_').unwrap_or(s);
        SrvProtocol::ALL
            .into_iter()
            .find(|proto| proto.as_str() == bare)
            .ok_or_else(|| ProtocolError::UnsupportedProtocol(s.to_owned()))
    }
}
