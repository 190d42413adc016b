//! Error taxonomy of the record editor
//!
//! There are two classes of validation failure. A [`FieldError`] is a problem
//! with what the customer typed: it is reported next to the form, which is
//! redisplayed with the submitted values. A [`ProtocolError`] means the caller
//! sent something the form can never produce (an unknown type, an out of range
//! TTL, ...); the whole request is rejected as a bad request.

use std::fmt;

use crate::database::StoreError;
use crate::rr::{DomainId, RecordId};

/// Prefix of every user facing validation message.
const VALIDATION_PREFIX: &str = "Could not validate DNS resource record";

/// Form field a validation failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    IpAddress,
    Ipv6Address,
    CanonicalName,
    Host,
    Data,
    ServiceName,
    TargetPort,
}

impl Field {
    /// Human readable field label, as shown on the form.
    pub fn label(&self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::IpAddress => "IP address",
            Field::Ipv6Address => "IPv6 address",
            Field::CanonicalName => "Canonical name",
            Field::Host => "Host",
            Field::Data => "Data",
            Field::ServiceName => "Service name",
            Field::TargetPort => "Target port",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldErrorKind {
    Empty,
    Invalid,
    OutOfZone,
    NotANumber,
}

/// A user input problem with a single form field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error)]
#[error("{}", self.describe())]
pub struct FieldError {
    field: Field,
    kind: FieldErrorKind,
}

impl FieldError {
    pub fn new(field: Field, kind: FieldErrorKind) -> Self {
        FieldError { field, kind }
    }

    pub fn empty(field: Field) -> Self {
        Self::new(field, FieldErrorKind::Empty)
    }

    pub fn invalid(field: Field) -> Self {
        Self::new(field, FieldErrorKind::Invalid)
    }

    pub fn out_of_zone(field: Field) -> Self {
        Self::new(field, FieldErrorKind::OutOfZone)
    }

    pub fn not_a_number(field: Field) -> Self {
        Self::new(field, FieldErrorKind::NotANumber)
    }

    pub fn field(&self) -> Field {
        self.field
    }

    pub fn kind(&self) -> FieldErrorKind {
        self.kind
    }

    /// The message shown to the customer.
    pub fn message(&self) -> String {
        format!("{VALIDATION_PREFIX}: {self}")
    }

    fn describe(&self) -> String {
        match self.kind {
            FieldErrorKind::Empty => format!("`{}` field cannot be empty.", self.field),
            FieldErrorKind::Invalid => format!("Invalid `{}` field.", self.field),
            FieldErrorKind::OutOfZone => "out-of-zone data".to_owned(),
            FieldErrorKind::NotANumber => format!("{} must be a number.", self.field),
        }
    }
}

/// Every field error found in one submission. Never empty once returned.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("{}", self.joined())]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    pub(crate) fn extend(&mut self, errors: FieldErrors) {
        self.0.extend(errors.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Whether any error refers to `field`.
    pub fn contains(&self, field: Field) -> bool {
        self.0.iter().any(|error| error.field == field)
    }

    /// The messages shown to the customer, one per error.
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(FieldError::message).collect()
    }

    fn joined(&self) -> String {
        self.0
            .iter()
            .map(FieldError::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl From<FieldError> for FieldErrors {
    fn from(error: FieldError) -> Self {
        FieldErrors(vec![error])
    }
}

impl<'a> IntoIterator for &'a FieldErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// The caller violated the form contract. Always answered with a bad request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    #[error("unsupported DNS class {0:?}")]
    UnsupportedClass(String),

    #[error("unsupported DNS record type {0:?}")]
    UnsupportedType(String),

    #[error("unsupported SRV protocol {0:?}")]
    UnsupportedProtocol(String),

    #[error("TTL {0:?} is not a number in [60, 2147483647]")]
    Ttl(String),

    #[error("MX preference {0:?} is not a number in [0, 65535]")]
    Preference(String),

    #[error("SRV priority {0:?} is not a number in [0, 65535]")]
    Priority(String),

    #[error("SRV weight {0:?} is not a number in [0, 65535]")]
    Weight(String),

    #[error("unknown domain {0}")]
    UnknownDomain(DomainId),

    #[error("unknown domain alias {0:?}")]
    UnknownAlias(String),

    #[error("unknown DNS resource record {0}")]
    UnknownRecord(RecordId),

    #[error("DNS resource record {id} is owned by {owner:?}")]
    NotEditable { id: RecordId, owner: String },
}

/// Outcome of validating one record submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("{0}")]
    Invalid(#[from] FieldErrors),

    #[error("bad request: {0}")]
    BadRequest(#[from] ProtocolError),
}

impl From<FieldError> for RecordError {
    fn from(error: FieldError) -> Self {
        RecordError::Invalid(error.into())
    }
}

/// Outcome of saving a record through the editor.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("{0}")]
    Invalid(FieldErrors),

    #[error("bad request: {0}")]
    BadRequest(ProtocolError),

    #[error("DNS record already exist.")]
    Duplicate,

    #[error("database error: {0}")]
    Database(#[source] StoreError),
}

impl SaveError {
    /// Whether the request must be answered with a generic bad request.
    pub fn is_bad_request(&self) -> bool {
        matches!(self, SaveError::BadRequest(_))
    }

    /// Messages to show next to the redisplayed form.
    ///
    /// Bad requests and database failures are not reported to the customer.
    pub fn user_messages(&self) -> Vec<String> {
        match self {
            SaveError::Invalid(errors) => errors.messages(),
            SaveError::Duplicate => vec![self.to_string()],
            SaveError::BadRequest(_) | SaveError::Database(_) => Vec::new(),
        }
    }
}

impl From<RecordError> for SaveError {
    fn from(error: RecordError) -> Self {
        match error {
            RecordError::Invalid(errors) => SaveError::Invalid(errors),
            RecordError::BadRequest(error) => SaveError::BadRequest(error),
        }
    }
}

impl From<ProtocolError> for SaveError {
    fn from(error: ProtocolError) -> Self {
        SaveError::BadRequest(error)
    }
}

impl From<StoreError> for SaveError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Duplicate => SaveError::Duplicate,
            StoreError::UnknownRecord(id) => {
                SaveError::BadRequest(ProtocolError::UnknownRecord(id))
            }
            error => SaveError::Database(error),
        }
    }
}
