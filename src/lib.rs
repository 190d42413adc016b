//! Customer managed DNS resource records for hosting control panels
//!
//! Customers add and edit A, AAAA, CNAME, MX, TXT, SPF and SRV records for their
//! domains through a form. This crate validates those submissions, completes
//! and IDNA-encodes names relative to the owning domain, encodes records into
//! the zone fragments stored by the panel, and decodes stored fragments back
//! into form values for editing.
//!
//! [`RecordEditor`] runs the whole add/edit flow against a [`RecordStore`];
//! [`ValidatedRecord`] and [`decode`] can also be used on their own.

pub mod codec;
pub mod database;
pub mod editor;
pub mod error;
pub mod events;
pub mod form;
pub mod rr;
pub mod validate;

pub use self::codec::{ZoneFragment, decode};
pub use self::database::{RecordStore, RecordTx, SqliteConfiguration, SqliteStore, StoreError};
pub use self::editor::{RecordEditor, SaveAction, Saved};
pub use self::error::{Field, FieldError, FieldErrors, ProtocolError, RecordError, SaveError};
pub use self::events::{EventDispatcher, RecordEvent, RecordEventKind, RecordListener};
pub use self::form::RecordForm;
pub use self::rr::{Origin, RawRecord, RecordType};
pub use self::validate::{RecordData, ValidatedRecord};
