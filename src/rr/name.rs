use std::{borrow::Cow, fmt, ops::Deref};

use hickory_proto::ProtoError;
use idna::{
    AsciiDenyList,
    uts46::{DnsLength, Hyphens, Uts46},
};

/// Convert a (possibly internationalized) name to its ASCII compatible form.
///
/// Labels are lowercased and punycoded where needed. Trailing dots and ASCII
/// characters which are not valid in a host name are preserved, so the result
/// still has to be checked with [`is_valid_domain_name`].
pub fn to_ascii(name: &str) -> Result<String, idna::Errors> {
    Uts46::new()
        .to_ascii(
            name.as_bytes(),
            AsciiDenyList::EMPTY,
            Hyphens::Allow,
            DnsLength::Ignore,
        )
        .map(Cow::into_owned)
}

/// Convert an ASCII compatible name back to Unicode for display.
///
/// Labels which cannot be decoded are left as they are.
pub fn to_unicode(name: &str) -> String {
    let (unicode, _errors) =
        Uts46::new().to_unicode(name.as_bytes(), AsciiDenyList::EMPTY, Hyphens::Allow);
    unicode.into_owned()
}

/// Domain name syntax check for an ASCII name without its trailing dot.
///
/// Labels are checked by UTS 46 with the STD3 rules: letters, digits and
/// inner hyphens, at most 63 characters each and 253 in total. On top of
/// that a name needs at least two labels and a top level label which is not
/// purely numeric.
pub fn is_valid_domain_name(name: &str) -> bool {
    if !name.is_ascii() {
        return false;
    }

    let lowercase = name.to_ascii_lowercase();
    let checked = Uts46::new().to_ascii(
        lowercase.as_bytes(),
        AsciiDenyList::STD3,
        Hyphens::CheckFirstLast,
        DnsLength::Verify,
    );
    if checked.is_err() {
        return false;
    }

    let mut labels = name.rsplit('.');
    let tld = labels.next().unwrap_or_default();
    labels.next().is_some() && !tld.is_empty() && !tld.bytes().all(|b| b.is_ascii_digit())
}

/// A validated, fully qualified DNS name in ASCII form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(hickory_proto::rr::Name);

impl Name {
    /// Build a fully qualified name from its ASCII form, with or without the
    /// trailing dot.
    pub fn from_ascii(name: &str) -> Result<Self, ProtoError> {
        let mut name = hickory_proto::rr::Name::from_ascii(name)?;
        name.set_fqdn(true);
        Ok(Name(name))
    }

    /// ASCII form with the trailing dot, as stored in zone fragments.
    pub fn to_ascii(&self) -> String {
        self.0.to_ascii()
    }

    /// ASCII form without the trailing dot.
    pub fn to_bare(&self) -> String {
        let mut ascii = self.0.to_ascii();
        ascii.pop();
        ascii
    }
}

impl Deref for Name {
    type Target = hickory_proto::rr::Name;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_ascii())
    }
}

impl From<Name> for hickory_proto::rr::Name {
    fn from(value: Name) -> Self {
        value.0
    }
}

/// The domain (main domain or alias) which owns a record.
///
/// Relative names entered by a customer are completed with the origin, and a
/// record name must stay inside the origin's zone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Origin {
    ascii: String,
}

impl Origin {
    /// Create an origin from a domain name as stored by the panel.
    ///
    /// The name is lowercased, stripped of trailing dots and IDNA encoded. A
    /// name which cannot be encoded is kept as is.
    pub fn new(domain: &str) -> Self {
        let lower = domain.trim_end_matches('.').to_lowercase();
        let ascii = to_ascii(&lower).unwrap_or(lower);
        Origin { ascii }
    }

    /// ASCII form of the origin without the trailing dot.
    pub fn as_str(&self) -> &str {
        &self.ascii
    }

    /// Canonicalize a customer entered name relative to this origin.
    ///
    /// `@` is the origin itself, a name without a trailing dot is relative to
    /// the origin, and the result is IDNA encoded. Empty input stays empty.
    /// Every non-empty result ends with a dot.
    pub fn canonicalize(&self, input: &str) -> Result<String, idna::Errors> {
        let lower = input.to_lowercase();
        let qualified = if lower == "@" {
            format!("{}.", self.ascii)
        } else if !lower.is_empty() && !lower.ends_with('.') {
            format!("{lower}.{}.", self.ascii)
        } else {
            lower
        };

        to_ascii(&qualified)
    }

    /// Whether a canonical (dot terminated) name is the origin or one of its
    /// subdomains. Comparison is case-insensitive.
    pub fn contains(&self, name: &str) -> bool {
        let Some(bare) = name.strip_suffix('.') else {
            return false;
        };
        let bare = bare.to_ascii_lowercase();

        bare == self.ascii
            || bare
                .strip_suffix(self.ascii.as_str())
                .is_some_and(|prefix| prefix.len() > 1 && prefix.ends_with('.'))
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.ascii)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example() -> Origin {
        Origin::new("example.com")
    }

    #[test]
    fn test_canonicalize_apex() {
        assert_eq!(example().canonicalize("@").unwrap(), "example.com.");
    }

    #[test]
    fn test_canonicalize_relative() {
        assert_eq!(example().canonicalize("host").unwrap(), "host.example.com.");
        assert_eq!(
            example().canonicalize("WWW.Host").unwrap(),
            "www.host.example.com."
        );
    }

    #[test]
    fn test_canonicalize_fully_qualified() {
        assert_eq!(
            example().canonicalize("mail.example.com.").unwrap(),
            "mail.example.com."
        );
        assert_eq!(example().canonicalize("other.org.").unwrap(), "other.org.");
    }

    #[test]
    fn test_canonicalize_empty() {
        assert_eq!(example().canonicalize("").unwrap(), "");
    }

    #[test]
    fn test_canonicalize_idna() {
        assert_eq!(
            example().canonicalize("bücher").unwrap(),
            "xn--bcher-kva.example.com."
        );
        let origin = Origin::new("bücher.de");
        assert_eq!(origin.as_str(), "xn--bcher-kva.de");
        assert_eq!(origin.canonicalize("@").unwrap(), "xn--bcher-kva.de.");
    }

    #[test]
    fn test_canonicalize_keeps_underscores() {
        assert_eq!(
            example().canonicalize("_dmarc").unwrap(),
            "_dmarc.example.com."
        );
    }

    #[test]
    fn test_origin_normalizes() {
        assert_eq!(Origin::new("Example.COM.").as_str(), "example.com");
    }

    #[test]
    fn test_contains() {
        let origin = example();
        assert!(origin.contains("example.com."));
        assert!(origin.contains("host.example.com."));
        assert!(origin.contains("a.b.EXAMPLE.com."));
        assert!(!origin.contains("other.com."));
        assert!(!origin.contains("fooexample.com."));
        assert!(!origin.contains("example.com.evil.org."));
        assert!(!origin.contains(".example.com."));
        assert!(!origin.contains("host.example.com"));
        assert!(!origin.contains(""));
    }

    #[test]
    fn test_valid_domain_names() {
        for name in [
            "example.com",
            "host.example.com",
            "a-b.example.com",
            "xn--bcher-kva.de",
            "1.2.example.com",
            "r3---sn-abc.example.com",
            "WWW.Example.COM",
        ] {
            assert!(is_valid_domain_name(name), "{name} should be valid");
        }
    }

    #[test]
    fn test_invalid_domain_names() {
        let long_label = format!("{}.com", "a".repeat(64));
        let long_name = format!("{}com", "abcdefghi.".repeat(26));
        for name in [
            "",
            "com",
            ".example.com",
            "example.com.",
            "-host.example.com",
            "host-.example.com",
            "ho st.example.com",
            "_dmarc.example.com",
            "host..example.com",
            "*.example.com",
            "example.123",
            "bücher.example.com",
            "host.example.com/24",
            long_label.as_str(),
            long_name.as_str(),
        ] {
            assert!(!is_valid_domain_name(name), "{name} should be invalid");
        }
    }

    #[test]
    fn test_name_from_ascii() {
        let name = Name::from_ascii("host.example.com").unwrap();
        assert!(name.is_fqdn());
        assert_eq!(name.to_ascii(), "host.example.com.");
        assert_eq!(name.to_bare(), "host.example.com");
        assert_eq!(name.to_string(), "host.example.com.");
    }

    #[test]
    fn test_to_unicode() {
        assert_eq!(to_unicode("xn--bcher-kva.example.com"), "bücher.example.com");
        assert_eq!(to_unicode("plain.example.com"), "plain.example.com");
    }
}
