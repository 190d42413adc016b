//! SQLite Database Identifiers
//!
//! The panel tables use integer primary keys. Each table gets its own newtype
//! so that a record id can never be passed where a domain id is expected.
//! An id of `0` is meaningful for [`AliasId`] (the main domain) and for
//! [`RecordId`] in forms (a record which does not exist yet).

macro_rules! impl_id {
    (
    $(#[$outer:meta])*
    pub struct $name:ident
   ) => {
       $(#[$outer])*
        #[derive(
            Debug,
            Clone,
            Copy,
            Default,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw database identifier
            pub const fn new(id: i64) -> $name {
                $name(id)
            }

            /// The raw database identifier
            pub const fn get(&self) -> i64 {
                self.0
            }

            /// Whether this is the `0` placeholder id
            pub const fn is_zero(&self) -> bool {
                self.0 == 0
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                $name(value)
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl ::rusqlite::types::FromSql for $name {
            fn column_result(
                value: ::rusqlite::types::ValueRef<'_>,
            ) -> ::rusqlite::types::FromSqlResult<Self> {
                <i64 as ::rusqlite::types::FromSql>::column_result(value).map($name)
            }
        }

        impl ::rusqlite::types::ToSql for $name {
            fn to_sql(&self) -> ::rusqlite::Result<::rusqlite::types::ToSqlOutput<'_>> {
                ::rusqlite::types::ToSql::to_sql(&self.0)
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = ::std::num::ParseIntError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse().map($name)
            }
        }
    };
}

impl_id! {
    #[doc="Main domain ID in the panel database"]
    pub struct DomainId
}

impl_id! {
    #[doc="Domain alias ID in the panel database, `0` for the main domain"]
    pub struct AliasId
}

impl_id! {
    #[doc="DNS Record ID in the panel database"]
    pub struct RecordId
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_alias_id_zero() {
        assert!(AliasId::default().is_zero());
        assert!(!AliasId::new(4).is_zero());
    }

    #[test]
    fn test_record_id_display() {
        let id = RecordId::new(42);
        assert_eq!(format!("{id}"), "42");
        assert_eq!(i64::from(id), 42);
    }

    #[test]
    fn test_domain_id_from_str() {
        assert_eq!(DomainId::from_str("17").unwrap(), DomainId::new(17));
        assert!(DomainId::from_str("not-an-id").is_err());
    }

    #[test]
    fn test_record_id_ordering() {
        assert!(RecordId::new(1) < RecordId::new(2));
        assert_eq!(
            RecordId::new(3).cmp(&RecordId::new(3)),
            std::cmp::Ordering::Equal
        );
    }

    #[test]
    fn test_id_serde_transparent() {
        let id: AliasId = serde_json::from_str("7").unwrap();
        assert_eq!(id, AliasId::new(7));
        assert_eq!(serde_json::to_string(&id).unwrap(), "7");
    }
}
