use std::{fmt, str::FromStr};

use crate::error::ProtocolError;

use super::parse_unsigned;

/// Time to live of a customer record, in seconds.
///
/// Only values in `[60, 2147483647]` can be constructed. The form never offers
/// anything outside that range, so a violation is a protocol error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeToLive(u32);

impl TimeToLive {
    pub const MIN: TimeToLive = TimeToLive(60);
    pub const MAX: TimeToLive = TimeToLive(2_147_483_647);

    /// One hour, used for new records and for stored names without a TTL.
    pub const DEFAULT: TimeToLive = TimeToLive(3600);

    /// Create a TTL from seconds, if it is within the accepted range.
    pub fn from_secs(secs: u32) -> Option<Self> {
        (Self::MIN.0..=Self::MAX.0)
            .contains(&secs)
            .then_some(TimeToLive(secs))
    }

    pub fn as_secs(&self) -> u32 {
        self.0
    }
}

impl Default for TimeToLive {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for TimeToLive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<TimeToLive> for u32 {
    fn from(value: TimeToLive) -> Self {
        value.0
    }
}

impl TryFrom<u32> for TimeToLive {
    type Error = ProtocolError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        TimeToLive::from_secs(value).ok_or_else(|| ProtocolError::Ttl(value.to_string()))
    }
}

impl FromStr for TimeToLive {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_unsigned(s)
            .and_then(|secs| u32::try_from(secs).ok())
            .and_then(TimeToLive::from_secs)
            .ok_or_else(|| ProtocolError::Ttl(s.to_owned()))
    }
}
