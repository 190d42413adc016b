//! Field validation for customer managed records
//!
//! Every record type has its own set of form fields and rules. The per-field
//! validators are plain functions; [`ValidatedRecord::validate`] runs the ones
//! a record type needs, canonicalizes names relative to the owning domain and
//! produces typed record data ready for encoding.
//!
//! Problems with what the customer typed are [`FieldError`]s. Values the form
//! can never produce (a TTL out of range, an unknown SRV protocol, ...) are
//! [`ProtocolError`]s and abort validation immediately.

use std::net::{Ipv4Addr, Ipv6Addr};

use hickory_proto::rr::{
    RData,
    rdata::{A, AAAA, CNAME, MX, SRV, TXT},
};

use crate::error::{Field, FieldError, FieldErrors, ProtocolError, RecordError};
use crate::form::RecordForm;
use crate::rr::{
    AsHickory, Name, Origin, RecordType, SrvProtocol, TimeToLive, is_valid_domain_name,
    parse_unsigned,
};

/// Longest service name label.
const MAX_SERVICE_LENGTH: usize = 63;

/// Validate the owner name of a record, given without its trailing dot.
///
/// TXT and CNAME owners may contain underscores (`_dmarc`, DKIM selectors),
/// which are ignored by the syntax check.
pub fn validate_name(name: &str, record_type: RecordType) -> Result<(), FieldError> {
    if name.is_empty() {
        return Err(FieldError::empty(Field::Name));
    }

    let valid = match record_type {
        RecordType::TXT | RecordType::CNAME => is_valid_domain_name(&name.replace('_', "")),
        _ => is_valid_domain_name(name),
    };

    if valid {
        Ok(())
    } else {
        Err(FieldError::invalid(Field::Name))
    }
}

/// Validate the address of an A record.
pub fn validate_ipv4(address: &str) -> Result<Ipv4Addr, FieldError> {
    if address.is_empty() {
        return Err(FieldError::empty(Field::IpAddress));
    }

    address
        .parse()
        .map_err(|_| FieldError::invalid(Field::IpAddress))
}

/// Validate the address of an AAAA record.
pub fn validate_ipv6(address: &str) -> Result<Ipv6Addr, FieldError> {
    if address.is_empty() {
        return Err(FieldError::empty(Field::Ipv6Address));
    }

    address
        .parse()
        .map_err(|_| FieldError::invalid(Field::Ipv6Address))
}

/// Validate a CNAME target without its trailing dot. `@` stands for the apex.
pub fn validate_cname(target: &str) -> Result<(), FieldError> {
    if target.is_empty() {
        return Err(FieldError::empty(Field::CanonicalName));
    }

    if target != "@" && !is_valid_domain_name(target) {
        return Err(FieldError::invalid(Field::CanonicalName));
    }

    Ok(())
}

/// Validate an MX or SRV target host without its trailing dot.
pub fn validate_host(host: &str) -> Result<(), FieldError> {
    if host.is_empty() {
        return Err(FieldError::empty(Field::Host));
    }

    if !is_valid_domain_name(host) {
        return Err(FieldError::invalid(Field::Host));
    }

    Ok(())
}

/// Validate the text of a TXT or SPF record.
///
/// Embedded double quotes are removed; the remaining text must only use
/// characters from `[A-Za-z0-9+?-*_~=:. /;@]`. Returns the text without
/// quotes.
pub fn validate_txt(data: &str) -> Result<String, FieldError> {
    if data.is_empty() {
        return Err(FieldError::empty(Field::Data));
    }

    let text = data.replace('"', "");
    if text.is_empty() || !text.bytes().all(is_txt_char) {
        return Err(FieldError::invalid(Field::Data));
    }

    Ok(text)
}

fn is_txt_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"+?-*_~=:. /;@".contains(&b)
}

/// Validate an SRV service name such as `_sip`.
pub fn validate_service_name(service: &str) -> Result<(), FieldError> {
    if service.is_empty() {
        return Err(FieldError::empty(Field::ServiceName));
    }

    let valid = service.len() <= MAX_SERVICE_LENGTH
        && service.strip_prefix('_').is_some_and(|rest| {
            rest.bytes().next().is_some_and(|b| b.is_ascii_alphanumeric())
                && rest
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
        });

    if valid {
        Ok(())
    } else {
        Err(FieldError::invalid(Field::ServiceName))
    }
}

/// Validate an SRV target port.
pub fn validate_port(port: &str) -> Result<u16, FieldError> {
    if port.is_empty() {
        return Err(FieldError::empty(Field::TargetPort));
    }

    let value = parse_unsigned(port).ok_or_else(|| FieldError::not_a_number(Field::TargetPort))?;
    u16::try_from(value).map_err(|_| FieldError::invalid(Field::TargetPort))
}

/// Validate the TTL of a record.
pub fn validate_ttl(ttl: &str) -> Result<TimeToLive, ProtocolError> {
    ttl.parse()
}

/// Validate an MX preference.
pub fn validate_preference(preference: &str) -> Result<u16, ProtocolError> {
    parse_u16(preference).ok_or_else(|| ProtocolError::Preference(preference.to_owned()))
}

/// Validate an SRV priority.
pub fn validate_priority(priority: &str) -> Result<u16, ProtocolError> {
    parse_u16(priority).ok_or_else(|| ProtocolError::Priority(priority.to_owned()))
}

/// Validate an SRV weight.
pub fn validate_weight(weight: &str) -> Result<u16, ProtocolError> {
    parse_u16(weight).ok_or_else(|| ProtocolError::Weight(weight.to_owned()))
}

fn parse_u16(value: &str) -> Option<u16> {
    parse_unsigned(value).and_then(|value| u16::try_from(value).ok())
}

/// Canonicalize a target name (CNAME, MX or SRV host) against the origin.
///
/// Targets may point outside of the zone.
fn target_name(
    origin: &Origin,
    input: &str,
    field: Field,
    check: impl FnOnce(&str) -> Result<(), FieldError>,
) -> Result<Name, FieldError> {
    let canonical = origin
        .canonicalize(input)
        .map_err(|_| FieldError::invalid(field))?;
    let bare = canonical.trim_end_matches('.');
    check(bare)?;
    Name::from_ascii(bare).map_err(|_| FieldError::invalid(field))
}

/// Canonicalize the owner name of a record and check that it is in zone.
fn owner_name(origin: &Origin, input: &str, record_type: RecordType) -> Result<Name, FieldError> {
    let canonical = origin
        .canonicalize(input)
        .map_err(|_| FieldError::invalid(Field::Name))?;

    if !canonical.is_empty() && !origin.contains(&canonical) {
        return Err(FieldError::out_of_zone(Field::Name));
    }

    let bare = canonical.trim_end_matches('.');
    validate_name(bare, record_type)?;
    Name::from_ascii(bare).map_err(|_| FieldError::invalid(Field::Name))
}

/// Fields of a validated SRV record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Srv {
    pub service: String,
    pub protocol: SrvProtocol,
    pub priority: u16,
    pub weight: u16,
    pub port: u16,
    pub target: Name,
}

/// Typed data of a validated record, one variant per record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordData {
    A(Ipv4Addr),
    AAAA(Ipv6Addr),
    CNAME(Name),
    MX { preference: u16, exchange: Name },
    TXT(String),
    SPF(String),
    SRV(Srv),
}

impl RecordData {
    /// Validate the type specific fields of a form.
    pub fn validate(
        record_type: RecordType,
        form: &RecordForm,
        origin: &Origin,
    ) -> Result<Self, RecordError> {
        let data = match record_type {
            RecordType::A => RecordData::A(validate_ipv4(&form.ipv4)?),
            RecordType::AAAA => RecordData::AAAA(validate_ipv6(&form.ipv6)?),
            RecordType::CNAME => RecordData::CNAME(target_name(
                origin,
                &form.cname,
                Field::CanonicalName,
                validate_cname,
            )?),
            RecordType::MX => {
                let preference = validate_preference(&form.srv_prio)?;
                let exchange = target_name(origin, &form.srv_host, Field::Host, validate_host)?;
                RecordData::MX {
                    preference,
                    exchange,
                }
            }
            RecordType::TXT => RecordData::TXT(validate_txt(&form.txt)?),
            RecordType::SPF => RecordData::SPF(validate_txt(&form.txt)?),
            RecordType::SRV => {
                let protocol: SrvProtocol = form.srv_proto.parse()?;
                let priority = validate_priority(&form.srv_prio)?;
                let weight = validate_weight(&form.srv_weight)?;

                let service = form.srv_name.to_lowercase();
                validate_service_name(&service)?;
                let port = validate_port(&form.srv_port)?;
                let target = target_name(origin, &form.srv_host, Field::Host, validate_host)?;

                RecordData::SRV(Srv {
                    service,
                    protocol,
                    priority,
                    weight,
                    port,
                    target,
                })
            }
        };

        Ok(data)
    }

    pub fn record_type(&self) -> RecordType {
        match self {
            RecordData::A(_) => RecordType::A,
            RecordData::AAAA(_) => RecordType::AAAA,
            RecordData::CNAME(_) => RecordType::CNAME,
            RecordData::MX { .. } => RecordType::MX,
            RecordData::TXT(_) => RecordType::TXT,
            RecordData::SPF(_) => RecordType::SPF,
            RecordData::SRV(_) => RecordType::SRV,
        }
    }
}

/// SPF data is carried as TXT data, which shares its wire format.
impl AsHickory for RecordData {
    type Hickory = RData;

    fn as_hickory(&self) -> Self::Hickory {
        match self {
            RecordData::A(address) => RData::A(A(*address)),
            RecordData::AAAA(address) => RData::AAAA(AAAA(*address)),
            RecordData::CNAME(target) => RData::CNAME(CNAME(target.clone().into())),
            RecordData::MX {
                preference,
                exchange,
            } => RData::MX(MX::new(*preference, exchange.clone().into())),
            RecordData::TXT(text) | RecordData::SPF(text) => {
                RData::TXT(TXT::new(vec![text.clone()]))
            }
            RecordData::SRV(srv) => RData::SRV(SRV::new(
                srv.priority,
                srv.weight,
                srv.port,
                srv.target.clone().into(),
            )),
        }
    }
}

/// A record which passed validation, with canonical names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRecord {
    name: Name,
    owner: Name,
    ttl: TimeToLive,
    data: RecordData,
}

impl ValidatedRecord {
    /// Validate a submitted form for a record of `record_type` in `origin`.
    ///
    /// Surrounding whitespace is ignored. The TTL is checked first; protocol
    /// errors are returned as soon as they are found, while the owner name
    /// error and the data error of a submission are collected together.
    #[tracing::instrument(skip_all, fields(%record_type, %origin), level = "trace")]
    pub fn validate(
        record_type: RecordType,
        form: &RecordForm,
        origin: &Origin,
    ) -> Result<Self, RecordError> {
        let form = form.cleaned();
        let ttl = validate_ttl(&form.ttl)?;

        let mut errors = FieldErrors::new();
        let name = match owner_name(origin, &form.name, record_type) {
            Ok(name) => Some(name),
            Err(error) => {
                errors.push(error);
                None
            }
        };

        let data = match RecordData::validate(record_type, &form, origin) {
            Ok(data) => Some(data),
            Err(RecordError::Invalid(invalid)) => {
                errors.extend(invalid);
                None
            }
            Err(error) => return Err(error),
        };

        let (Some(name), Some(data)) = (name, data) else {
            tracing::debug!("Invalid DNS resource record: {errors}");
            return Err(errors.into());
        };

        let owner = match &data {
            RecordData::SRV(srv) => Name::from_ascii(&format!(
                "{}.{}.{}",
                srv.service,
                srv.protocol.label(),
                name.to_ascii()
            ))
            .map_err(|_| FieldError::invalid(Field::Name))?,
            _ => name.clone(),
        };

        Ok(ValidatedRecord {
            name,
            owner,
            ttl,
            data,
        })
    }

    /// The owner name as entered, without SRV service and protocol labels.
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// The full owner name of the record. For SRV records this carries the
    /// service and protocol labels.
    pub fn owner(&self) -> &Name {
        &self.owner
    }

    pub fn ttl(&self) -> TimeToLive {
        self.ttl
    }

    pub fn data(&self) -> &RecordData {
        &self.data
    }

    pub fn record_type(&self) -> RecordType {
        self.data.record_type()
    }
}

impl AsHickory for ValidatedRecord {
    type Hickory = hickory_proto::rr::Record<RData>;

    fn as_hickory(&self) -> Self::Hickory {
        hickory_proto::rr::Record::from_rdata(
            self.owner.clone().into(),
            self.ttl.into(),
            self.data.as_hickory(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FieldErrorKind;

    static_assertions::assert_impl_all!(ValidatedRecord: Send, Sync);
    static_assertions::assert_impl_all!(Origin: Send, Sync);

    fn origin() -> Origin {
        Origin::new("example.com")
    }

    fn form(name: &str) -> RecordForm {
        RecordForm {
            name: name.into(),
            ..RecordForm::new()
        }
    }

    fn field_errors(result: Result<ValidatedRecord, RecordError>) -> FieldErrors {
        match result {
            Err(RecordError::Invalid(errors)) => errors,
            other => panic!("expected field errors, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("host.example.com", RecordType::A).is_ok());
        assert_eq!(
            validate_name("", RecordType::A).unwrap_err().kind(),
            FieldErrorKind::Empty
        );
        assert!(validate_name("_dmarc.example.com", RecordType::A).is_err());
        assert!(validate_name("_dmarc.example.com", RecordType::TXT).is_ok());
        assert!(validate_name("_sip.example.com", RecordType::CNAME).is_ok());
        assert!(validate_name("_spf.example.com", RecordType::SPF).is_err());
    }

    #[test]
    fn test_validate_ipv4() {
        assert_eq!(
            validate_ipv4("192.0.2.10").unwrap(),
            Ipv4Addr::new(192, 0, 2, 10)
        );
        assert_eq!(
            validate_ipv4("999.1.1.1").unwrap_err(),
            FieldError::invalid(Field::IpAddress)
        );
        assert_eq!(
            validate_ipv4("::1").unwrap_err(),
            FieldError::invalid(Field::IpAddress)
        );
        assert_eq!(
            validate_ipv4("").unwrap_err(),
            FieldError::empty(Field::IpAddress)
        );
    }

    #[test]
    fn test_validate_ipv6() {
        assert!(validate_ipv6("2001:db8::1").is_ok());
        assert!(validate_ipv6("::1").is_ok());
        assert_eq!(
            validate_ipv6("192.0.2.10").unwrap_err(),
            FieldError::invalid(Field::Ipv6Address)
        );
        assert_eq!(
            validate_ipv6("").unwrap_err(),
            FieldError::empty(Field::Ipv6Address)
        );
    }

    #[test]
    fn test_validate_cname() {
        assert!(validate_cname("@").is_ok());
        assert!(validate_cname("target.example.net").is_ok());
        assert_eq!(
            validate_cname("").unwrap_err(),
            FieldError::empty(Field::CanonicalName)
        );
        assert_eq!(
            validate_cname("bad name.example.net").unwrap_err(),
            FieldError::invalid(Field::CanonicalName)
        );
    }

    #[test]
    fn test_validate_txt() {
        assert_eq!(validate_txt("v=spf1 mx ~all").unwrap(), "v=spf1 mx ~all");
        assert_eq!(
            validate_txt("say \"hello\"").unwrap(),
            "say hello",
            "quotes are stripped before the character check"
        );
        assert_eq!(
            validate_txt("color #fff").unwrap_err(),
            FieldError::invalid(Field::Data)
        );
        assert_eq!(validate_txt("").unwrap_err(), FieldError::empty(Field::Data));
        assert_eq!(
            validate_txt("\"\"").unwrap_err(),
            FieldError::invalid(Field::Data)
        );
    }

    #[test]
    fn test_validate_service_name() {
        assert!(validate_service_name("_sip").is_ok());
        assert!(validate_service_name("_xmpp-server").is_ok());
        assert_eq!(
            validate_service_name("").unwrap_err(),
            FieldError::empty(Field::ServiceName)
        );
        for name in ["sip", "_", "_-sip", "_sip.tcp", "_s p"] {
            assert_eq!(
                validate_service_name(name).unwrap_err(),
                FieldError::invalid(Field::ServiceName),
                "{name}"
            );
        }
    }

    #[test]
    fn test_validate_port() {
        assert_eq!(validate_port("5060").unwrap(), 5060);
        assert_eq!(
            validate_port("").unwrap_err(),
            FieldError::empty(Field::TargetPort)
        );
        assert_eq!(
            validate_port("http").unwrap_err(),
            FieldError::not_a_number(Field::TargetPort)
        );
        assert_eq!(
            validate_port("65536").unwrap_err(),
            FieldError::invalid(Field::TargetPort)
        );
    }

    #[test]
    fn test_protocol_numbers() {
        assert_eq!(validate_preference("65535").unwrap(), 65535);
        assert_eq!(
            validate_preference("65536").unwrap_err(),
            ProtocolError::Preference("65536".into())
        );
        assert!(validate_priority("-1").is_err());
        assert!(validate_weight("").is_err());
        assert!(validate_ttl("59").is_err());
        assert_eq!(validate_ttl("60").unwrap().as_secs(), 60);
    }

    #[test]
    fn test_validate_a_record() {
        let record = ValidatedRecord::validate(
            RecordType::A,
            &RecordForm {
                ipv4: "192.0.2.10".into(),
                ..form("www")
            },
            &origin(),
        )
        .unwrap();

        assert_eq!(record.name().to_ascii(), "www.example.com.");
        assert_eq!(record.owner(), record.name());
        assert_eq!(record.ttl(), TimeToLive::DEFAULT);
        assert_eq!(
            record.data(),
            &RecordData::A(Ipv4Addr::new(192, 0, 2, 10))
        );
    }

    #[test]
    fn test_validate_trims_input() {
        let record = ValidatedRecord::validate(
            RecordType::A,
            &RecordForm {
                ttl: " 300 ".into(),
                ipv4: " 192.0.2.10\n".into(),
                ..form(" www ")
            },
            &origin(),
        )
        .unwrap();

        assert_eq!(record.name().to_ascii(), "www.example.com.");
        assert_eq!(record.ttl().as_secs(), 300);
    }

    #[test]
    fn test_validate_out_of_zone() {
        let errors = field_errors(ValidatedRecord::validate(
            RecordType::A,
            &RecordForm {
                ipv4: "192.0.2.10".into(),
                ..form("host.other.com.")
            },
            &origin(),
        ));

        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.iter().next().unwrap(),
            &FieldError::out_of_zone(Field::Name)
        );
    }

    #[test]
    fn test_validate_collects_field_errors() {
        let errors = field_errors(ValidatedRecord::validate(
            RecordType::A,
            &RecordForm {
                ipv4: "999.1.1.1".into(),
                ..form("")
            },
            &origin(),
        ));

        assert_eq!(errors.len(), 2);
        assert!(errors.contains(Field::Name));
        assert!(errors.contains(Field::IpAddress));
    }

    #[test]
    fn test_protocol_error_wins_over_field_errors() {
        let result = ValidatedRecord::validate(
            RecordType::MX,
            &RecordForm {
                srv_prio: "70000".into(),
                srv_host: "mail".into(),
                ..form("")
            },
            &origin(),
        );

        assert_eq!(
            result.unwrap_err(),
            RecordError::BadRequest(ProtocolError::Preference("70000".into()))
        );
    }

    #[test]
    fn test_validate_ttl_out_of_range() {
        for ttl in ["59", "2147483648", "", "ten"] {
            let result = ValidatedRecord::validate(
                RecordType::A,
                &RecordForm {
                    ttl: ttl.into(),
                    ipv4: "192.0.2.10".into(),
                    ..form("www")
                },
                &origin(),
            );
            assert_eq!(
                result.unwrap_err(),
                RecordError::BadRequest(ProtocolError::Ttl(ttl.into()))
            );
        }
    }

    #[test]
    fn test_validate_cname_record() {
        let record = ValidatedRecord::validate(
            RecordType::CNAME,
            &RecordForm {
                cname: "@".into(),
                ..form("_domainkey.www")
            },
            &origin(),
        )
        .unwrap();

        assert_eq!(record.name().to_ascii(), "_domainkey.www.example.com.");
        let RecordData::CNAME(target) = record.data() else {
            panic!("expected CNAME data");
        };
        assert_eq!(target.to_ascii(), "example.com.");
    }

    #[test]
    fn test_validate_mx_record() {
        let record = ValidatedRecord::validate(
            RecordType::MX,
            &RecordForm {
                srv_prio: "10".into(),
                srv_host: "Mail".into(),
                ..form("@")
            },
            &origin(),
        )
        .unwrap();

        assert_eq!(record.name().to_ascii(), "example.com.");
        assert_eq!(
            record.data(),
            &RecordData::MX {
                preference: 10,
                exchange: Name::from_ascii("mail.example.com").unwrap(),
            }
        );
    }

    #[test]
    fn test_validate_mx_target_out_of_zone_allowed() {
        let record = ValidatedRecord::validate(
            RecordType::MX,
            &RecordForm {
                srv_prio: "5".into(),
                srv_host: "mx.provider.net.".into(),
                ..form("@")
            },
            &origin(),
        )
        .unwrap();

        let RecordData::MX { exchange, .. } = record.data() else {
            panic!("expected MX data");
        };
        assert_eq!(exchange.to_ascii(), "mx.provider.net.");
    }

    #[test]
    fn test_validate_srv_record() {
        let record = ValidatedRecord::validate(
            RecordType::SRV,
            &RecordForm {
                srv_name: "_SIP".into(),
                srv_proto: "tcp".into(),
                srv_prio: "10".into(),
                srv_weight: "20".into(),
                srv_port: "5060".into(),
                srv_host: "host.example.com.".into(),
                ..form("@")
            },
            &origin(),
        )
        .unwrap();

        assert_eq!(record.name().to_ascii(), "example.com.");
        assert_eq!(record.owner().to_ascii(), "_sip._tcp.example.com.");
        let RecordData::SRV(srv) = record.data() else {
            panic!("expected SRV data");
        };
        assert_eq!(srv.service, "_sip");
        assert_eq!(srv.protocol, SrvProtocol::Tcp);
        assert_eq!((srv.priority, srv.weight, srv.port), (10, 20, 5060));
        assert_eq!(srv.target.to_ascii(), "host.example.com.");
    }

    #[test]
    fn test_validate_srv_protocol_errors() {
        let base = RecordForm {
            srv_name: "_sip".into(),
            srv_proto: "tcp".into(),
            srv_port: "5060".into(),
            srv_host: "host".into(),
            ..form("@")
        };

        let cases = [
            (
                RecordForm {
                    srv_proto: "sctp".into(),
                    ..base.clone()
                },
                ProtocolError::UnsupportedProtocol("sctp".into()),
            ),
            (
                RecordForm {
                    srv_prio: "65536".into(),
                    ..base.clone()
                },
                ProtocolError::Priority("65536".into()),
            ),
            (
                RecordForm {
                    srv_weight: "x".into(),
                    ..base.clone()
                },
                ProtocolError::Weight("x".into()),
            ),
        ];

        for (form, expected) in cases {
            assert_eq!(
                ValidatedRecord::validate(RecordType::SRV, &form, &origin()).unwrap_err(),
                RecordError::BadRequest(expected)
            );
        }
    }

    #[test]
    fn test_validate_srv_port_is_field_error() {
        let errors = field_errors(ValidatedRecord::validate(
            RecordType::SRV,
            &RecordForm {
                srv_name: "_sip".into(),
                srv_proto: "udp".into(),
                srv_port: "sip".into(),
                srv_host: "host".into(),
                ..form("@")
            },
            &origin(),
        ));

        assert_eq!(
            errors.iter().collect::<Vec<_>>(),
            vec![&FieldError::not_a_number(Field::TargetPort)]
        );
    }

    #[test]
    fn test_validate_txt_record() {
        let record = ValidatedRecord::validate(
            RecordType::TXT,
            &RecordForm {
                txt: "\"v=DMARC1; p=none\"".into(),
                ..form("_dmarc")
            },
            &origin(),
        )
        .unwrap();

        assert_eq!(record.name().to_ascii(), "_dmarc.example.com.");
        assert_eq!(record.data(), &RecordData::TXT("v=DMARC1; p=none".into()));
    }

    #[test]
    fn test_validate_idna_owner() {
        let record = ValidatedRecord::validate(
            RecordType::AAAA,
            &RecordForm {
                ipv6: "2001:db8::1".into(),
                ..form("Bücher")
            },
            &origin(),
        )
        .unwrap();

        assert_eq!(record.name().to_ascii(), "xn--bcher-kva.example.com.");
    }

    #[test]
    fn test_as_hickory() {
        let record = ValidatedRecord::validate(
            RecordType::MX,
            &RecordForm {
                ttl: "600".into(),
                srv_prio: "10".into(),
                srv_host: "mail".into(),
                ..form("@")
            },
            &origin(),
        )
        .unwrap();

        let hickory = record.as_hickory();
        assert_eq!(hickory.ttl(), 600);
        assert_eq!(hickory.record_type(), hickory_proto::rr::RecordType::MX);
        assert_eq!(hickory.name().to_ascii(), "example.com.");
        let RData::MX(mx) = hickory.data() else {
            panic!("expected MX rdata");
        };
        assert_eq!(mx.preference(), 10);
        assert_eq!(mx.exchange().to_ascii(), "mail.example.com.");
    }

    #[test]
    fn test_spf_as_txt_rdata() {
        let data = RecordData::SPF("v=spf1 -all".into());
        assert_eq!(data.record_type(), RecordType::SPF);
        assert!(matches!(data.as_hickory(), RData::TXT(_)));
    }
}
