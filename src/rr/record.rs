use std::fmt;

use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::database::FromRow;
use crate::error::ProtocolError;

use super::RecordType;

/// Lifecycle status of a stored record.
///
/// The panel only ever writes `toadd` and `tochange`. An external
/// reconciliation process moves records to `ok`, or leaves an error message
/// in the status column when it fails.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordStatus {
    Ok,
    ToAdd,
    ToChange,
    ToDelete,
    Error(String),
}

impl RecordStatus {
    pub fn as_str(&self) -> &str {
        match self {
            RecordStatus::Ok => "ok",
            RecordStatus::ToAdd => "toadd",
            RecordStatus::ToChange => "tochange",
            RecordStatus::ToDelete => "todelete",
            RecordStatus::Error(message) => message,
        }
    }

    /// Whether the reconciliation process failed on this record.
    pub fn is_error(&self) -> bool {
        matches!(self, RecordStatus::Error(_))
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for RecordStatus {
    fn from(value: &str) -> Self {
        match value {
            "ok" => RecordStatus::Ok,
            "toadd" => RecordStatus::ToAdd,
            "tochange" => RecordStatus::ToChange,
            "todelete" => RecordStatus::ToDelete,
            other => RecordStatus::Error(other.to_owned()),
        }
    }
}

impl ToSql for RecordStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for RecordStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str().map(RecordStatus::from)
    }
}

/// Identifies the panel feature which created a record.
///
/// Other features (e.g. external mail servers) create records in the same
/// table. Customers may only edit the records of the custom DNS feature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerTag(String);

impl OwnerTag {
    pub const CUSTOM_DNS: &'static str = "custom_dns_feature";

    pub fn new(tag: impl Into<String>) -> Self {
        OwnerTag(tag.into())
    }

    /// The tag of records created through the record editor.
    pub fn custom_dns() -> Self {
        OwnerTag(Self::CUSTOM_DNS.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether a customer may edit records with this tag.
    pub fn is_editable(&self) -> bool {
        self.0 == Self::CUSTOM_DNS
    }
}

impl Default for OwnerTag {
    fn default() -> Self {
        OwnerTag::custom_dns()
    }
}

impl fmt::Display for OwnerTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl ToSql for OwnerTag {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0.as_str()))
    }
}

impl FromSql for OwnerTag {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str().map(OwnerTag::new)
    }
}

/// A record as persisted in the `domain_dns` table.
///
/// `name` is the dot terminated owner name followed by a tab and the TTL
/// (`host.example.com.\t3600`); SRV owner names carry the service and
/// protocol labels. `rdata` is the type specific presentation of the data.
///
/// Type and class are kept as stored: rows written by other panel features
/// may hold values this crate does not manage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub name: String,
    pub rdata: String,
    pub class: String,
    pub record_type: String,
    pub owner: OwnerTag,
    pub status: RecordStatus,
}

impl RawRecord {
    /// The record type, if it is one managed by the record editor.
    pub fn kind(&self) -> Result<RecordType, ProtocolError> {
        self.record_type.parse()
    }

    /// Whether a customer may edit this record.
    pub fn is_editable(&self) -> bool {
        self.owner.is_editable()
    }
}

impl FromRow for RawRecord {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self>
    where
        Self: Sized,
    {
        Ok(RawRecord {
            name: row.get("domain_dns")?,
            rdata: row.get("domain_text")?,
            class: row.get("domain_class")?,
            record_type: row.get("domain_type")?,
            owner: row.get("owned_by")?,
            status: row.get("domain_dns_status")?,
        })
    }
}
