//! Resource Record Definitions for customer managed DNS records
//!
//! These are the building blocks shared by the validator, the codec and the
//! persistence layer: record types and classes, time to live, canonical names
//! and the stored zone fragment of a record.

mod id;
mod name;
mod record;
mod record_type;
mod ttl;

pub use self::id::{AliasId, DomainId, RecordId};
pub use self::name::{Name, Origin, is_valid_domain_name, to_ascii, to_unicode};
pub use self::record::{OwnerTag, RawRecord, RecordStatus};
pub use self::record_type::{DnsClass, RecordType, SrvProtocol};
pub use self::ttl::TimeToLive;

/// Trait for converting panel-dns types to their hickory-dns equivalents
///
/// This gives the records produced here a path into the hickory-dns
/// ecosystem, e.g. for a zone generator that consumes validated records.
pub trait AsHickory {
    /// The corresponding hickory-dns type
    type Hickory;

    /// Convert this type to its hickory-dns equivalent
    fn as_hickory(&self) -> Self::Hickory;
}

/// Parse a decimal number made only of ASCII digits.
///
/// Signs, whitespace and empty strings are rejected, as are values which do not
/// fit in a `u64`.
pub(crate) fn parse_unsigned(value: &str) -> Option<u64> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    value.parse().ok()
}
