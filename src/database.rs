//! SQLite persistence for domains, aliases and customer records
//!
//! The record editor talks to storage through [`RecordStore`]. The bundled
//! implementation, [`SqliteStore`], keeps the panel tables (`domain`,
//! `domain_aliasses` and `domain_dns`) in a single SQLite database.

use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, ThreadId};

use camino::{Utf8Path, Utf8PathBuf};
use rusqlite::Connection;
use serde::Deserialize;

use crate::rr::{AliasId, DomainId, Origin, RawRecord, RecordId, RecordStatus};

mod domain;
mod record;

use self::domain::DomainPersistence;
use self::record::RecordPersistence;

pub(crate) trait FromRow {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self>
    where
        Self: Sized;
}

/// Schema migrations, applied in order. The number of applied migrations is
/// tracked in the `user_version` pragma.
const MIGRATIONS: [&str; 1] = [include_str!("migrations/01.domain_dns.sql")];

/// Configuration for the SQLite backend.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SqliteConfiguration {
    #[serde(default)]
    path: Option<Utf8PathBuf>,
}

impl SqliteConfiguration {
    /// A database stored at `path`.
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// A database which only lives in memory.
    pub fn in_memory() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Utf8Path> {
        self.path.as_deref()
    }
}

/// Error raised by a [`RecordStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A record with the same owner, class, type and data already exists.
    #[error("duplicate DNS resource record")]
    Duplicate,

    /// The record to update is gone, or no longer belongs to the customer.
    #[error("unknown DNS resource record {0}")]
    UnknownRecord(RecordId),

    /// The store was used from inside one of its own transactions, for
    /// example by a record listener.
    #[error("store used from inside its own transaction")]
    Reentrant,

    #[error(transparent)]
    Sqlite(rusqlite::Error),
}

impl From<rusqlite::Error> for StoreError {
    fn from(error: rusqlite::Error) -> Self {
        match &error {
            rusqlite::Error::SqliteFailure(failure, _)
                if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                StoreError::Duplicate
            }
            _ => StoreError::Sqlite(error),
        }
    }
}

/// The main domain of a customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    pub id: DomainId,
    pub name: String,
    pub status: String,
}

impl FromRow for Domain {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self>
    where
        Self: Sized,
    {
        Ok(Domain {
            id: row.get("domain_id")?,
            name: row.get("domain_name")?,
            status: row.get("domain_status")?,
        })
    }
}

/// An alias of a customer's main domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    pub id: AliasId,
    pub domain_id: DomainId,
    pub name: String,
    pub status: String,
}

impl FromRow for Alias {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self>
    where
        Self: Sized,
    {
        Ok(Alias {
            id: row.get("alias_id")?,
            domain_id: row.get("domain_id")?,
            name: row.get("alias_name")?,
            status: row.get("alias_status")?,
        })
    }
}

/// A domain a new record can be added to. The main domain has id `0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainChoice {
    pub id: AliasId,
    pub name: String,
}

/// A stored record, with the name of the domain or alias it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    pub id: RecordId,
    pub domain_id: DomainId,
    pub alias_id: AliasId,
    pub zone_name: String,
    pub zone_status: String,
    pub record: RawRecord,
}

impl StoredRecord {
    /// The owning domain of the record, used to complete relative names.
    pub fn origin(&self) -> Origin {
        Origin::new(&self.zone_name)
    }
}

impl FromRow for StoredRecord {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self>
    where
        Self: Sized,
    {
        Ok(StoredRecord {
            id: row.get("domain_dns_id")?,
            domain_id: row.get("domain_id")?,
            alias_id: row.get("alias_id")?,
            zone_name: row.get("zone_name")?,
            zone_status: row.get("zone_status")?,
            record: RawRecord::from_row(row)?,
        })
    }
}

/// A record to be written by the record editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    pub domain_id: DomainId,
    pub alias_id: AliasId,
    pub name: String,
    pub class: String,
    pub record_type: String,
    pub rdata: String,
}

/// Operations available inside a [`RecordStore::transaction`].
pub trait RecordTx {
    /// A record, only if it belongs to the given main domain. Sees the
    /// writes made earlier in the transaction.
    fn record(
        &self,
        domain_id: DomainId,
        record_id: RecordId,
    ) -> Result<Option<StoredRecord>, StoreError>;

    /// Insert a customer record, scheduled for addition.
    fn insert(&self, record: &NewRecord) -> Result<RecordId, StoreError>;

    /// Replace the zone fragment of a customer record and schedule it for
    /// update. Fails with [`StoreError::UnknownRecord`] when no such record
    /// exists.
    fn update(&self, id: RecordId, record: &NewRecord) -> Result<(), StoreError>;

    /// Schedule every record of the domain left in an error state by the
    /// reconciliation process for another attempt. Returns the number of
    /// records rescheduled.
    fn resync_errored(&self, domain_id: DomainId) -> Result<usize, StoreError>;
}

/// Storage used by the record editor.
pub trait RecordStore {
    /// The main domain of a customer.
    fn main_domain(&self, domain_id: DomainId) -> Result<Option<Domain>, StoreError>;

    /// An alias, only if it belongs to the given main domain.
    fn alias(&self, domain_id: DomainId, alias_id: AliasId) -> Result<Option<Alias>, StoreError>;

    /// Domains a new record can be added to: the main domain (as id `0`) and
    /// every alias which is not still being ordered.
    fn domains(&self, domain_id: DomainId) -> Result<Vec<DomainChoice>, StoreError>;

    /// A record, only if it belongs to the given main domain.
    fn record(
        &self,
        domain_id: DomainId,
        record_id: RecordId,
    ) -> Result<Option<StoredRecord>, StoreError>;

    /// Run `f` in a transaction, committed only when `f` succeeds.
    ///
    /// `f` must go through the [`RecordTx`] it is given. Calling back into
    /// the store from `f` fails with [`StoreError::Reentrant`].
    fn transaction<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&dyn RecordTx) -> Result<T, StoreError>;
}

/// [`RecordStore`] backed by SQLite.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    connection: Arc<Mutex<Connection>>,
    writer: Arc<Mutex<Option<ThreadId>>>,
}

/// Marks the current thread as the one running a transaction until dropped.
struct WriterGuard<'s>(&'s Mutex<Option<ThreadId>>);

impl<'s> WriterGuard<'s> {
    fn enter(writer: &'s Mutex<Option<ThreadId>>) -> Self {
        *writer.lock().expect("writer poisoned") = Some(thread::current().id());
        WriterGuard(writer)
    }
}

impl Drop for WriterGuard<'_> {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.0.lock() {
            *writer = None;
        }
    }
}

impl SqliteStore {
    pub fn new(connection: Connection) -> Self {
        Self {
            connection: Arc::new(Mutex::new(connection)),
            writer: Arc::new(Mutex::new(None)),
        }
    }

    /// Lock the connection. The lock is not reentrant, so a thread inside a
    /// transaction gets an error instead of waiting on itself.
    fn connection(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        let writer = *self.writer.lock().expect("writer poisoned");
        if writer == Some(thread::current().id()) {
            tracing::warn!("store used from inside its own transaction");
            return Err(StoreError::Reentrant);
        }
        Ok(self.connection.lock().expect("connection poisoned"))
    }

    fn prepare(connection: Connection) -> rusqlite::Result<Self> {
        let connection = migrate(connection)?;
        Ok(Self::new(connection))
    }

    /// Opens the store described by a configuration, applying migrations.
    pub fn new_from_config(config: &SqliteConfiguration) -> rusqlite::Result<Self> {
        let connection = if let Some(path) = &config.path {
            rusqlite::Connection::open(path)?
        } else {
            rusqlite::Connection::open_in_memory()?
        };

        Self::prepare(connection)
    }

    /// Creates a store in an in-memory database.
    pub fn new_in_memory() -> rusqlite::Result<Self> {
        let connection = rusqlite::Connection::open_in_memory()?;
        Self::prepare(connection)
    }

    /// Register a customer main domain.
    #[tracing::instrument(skip_all, fields(domain=%name), level = "debug")]
    pub fn add_domain(&self, name: &str) -> Result<DomainId, StoreError> {
        let conn = self.connection()?;
        let dx = DomainPersistence::new(&conn);
        let id = dx.insert_domain(Origin::new(name).as_str())?;
        tracing::debug!("added domain {id}");
        Ok(id)
    }

    /// Register an alias of a main domain.
    #[tracing::instrument(skip_all, fields(domain=%domain_id, alias=%name), level = "debug")]
    pub fn add_alias(
        &self,
        domain_id: DomainId,
        name: &str,
        status: &str,
    ) -> Result<AliasId, StoreError> {
        let conn = self.connection()?;
        let dx = DomainPersistence::new(&conn);
        let id = dx.insert_alias(domain_id, Origin::new(name).as_str(), status)?;
        tracing::debug!("added alias {id}");
        Ok(id)
    }

    /// Set the status of a record, as the reconciliation process does.
    #[tracing::instrument(skip_all, fields(record=%id, %status), level = "debug")]
    pub fn set_status(&self, id: RecordId, status: &RecordStatus) -> Result<usize, StoreError> {
        let conn = self.connection()?;
        let rx = RecordPersistence::new(&conn);
        Ok(rx.set_status(id, status)?)
    }
}

impl RecordStore for SqliteStore {
    #[tracing::instrument(skip_all, fields(domain=%domain_id), level = "debug")]
    fn main_domain(&self, domain_id: DomainId) -> Result<Option<Domain>, StoreError> {
        let conn = self.connection()?;
        let dx = DomainPersistence::new(&conn);
        Ok(dx.domain(domain_id)?)
    }

    #[tracing::instrument(skip_all, fields(domain=%domain_id, alias=%alias_id), level = "debug")]
    fn alias(&self, domain_id: DomainId, alias_id: AliasId) -> Result<Option<Alias>, StoreError> {
        let conn = self.connection()?;
        let dx = DomainPersistence::new(&conn);
        Ok(dx.alias(domain_id, alias_id)?)
    }

    #[tracing::instrument(skip_all, fields(domain=%domain_id), level = "debug")]
    fn domains(&self, domain_id: DomainId) -> Result<Vec<DomainChoice>, StoreError> {
        let conn = self.connection()?;
        let dx = DomainPersistence::new(&conn);
        let domains = dx.choices(domain_id)?;
        tracing::debug!("found {n} domains", n = domains.len());
        Ok(domains)
    }

    #[tracing::instrument(skip_all, fields(domain=%domain_id, record=%record_id), level = "debug")]
    fn record(
        &self,
        domain_id: DomainId,
        record_id: RecordId,
    ) -> Result<Option<StoredRecord>, StoreError> {
        let conn = self.connection()?;
        let rx = RecordPersistence::new(&conn);
        Ok(rx.get(domain_id, record_id)?)
    }

    #[tracing::instrument(skip_all, level = "debug")]
    fn transaction<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&dyn RecordTx) -> Result<T, StoreError>,
    {
        let mut conn = self.connection()?;
        let tx = conn.transaction()?;
        let value = {
            let _writer = WriterGuard::enter(&self.writer);
            f(&RecordPersistence::new(&tx))?
        };
        tx.commit()?;
        Ok(value)
    }
}

/// Enable foreign keys and bring the schema up to date.
#[tracing::instrument(skip_all, level = "debug")]
fn migrate(mut connection: Connection) -> rusqlite::Result<Connection> {
    connection.pragma_update(None, "foreign_keys", true)?;

    let applied: i64 = connection.pragma_query_value(None, "user_version", |row| row.get(0))?;
    let tx = connection.transaction()?;
    for (version, migration) in (1i64..).zip(MIGRATIONS) {
        if version <= applied {
            continue;
        }
        tracing::debug!("applying migration {version}");
        tx.execute_batch(migration)?;
        tx.pragma_update(None, "user_version", version)?;
    }
    tx.commit()?;

    Ok(connection)
}

struct QueryBuilder<const N: usize> {
    table: &'static str,
    columns: [&'static str; N],
    primary: &'static str,
}

impl<const N: usize> QueryBuilder<N> {
    fn select(&self, filters: &str) -> String {
        let columns = self.columns.join(", ");
        format!(
            "SELECT {columns} FROM {table} {filters}",
            table = self.table
        )
    }

    /// Columns qualified with the table name, for queries joining other tables.
    fn qualified_columns(&self) -> String {
        self.columns
            .iter()
            .map(|c| format!("{table}.{c} AS {c}", table = self.table))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn insert(&self) -> String {
        let columns = self
            .columns
            .iter()
            .filter(|&&c| c != self.primary)
            .copied()
            .collect::<Vec<_>>();
        let params = columns
            .iter()
            .map(|c| format!(":{c}"))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "INSERT INTO {table} ({columns}) VALUES ({params})",
            table = self.table,
            columns = columns.join(", ")
        )
    }

    fn update(&self, columns: &[&str]) -> String {
        let assignments = columns
            .iter()
            .map(|c| format!("{c} = :{c}"))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "UPDATE {table} SET {assignments} WHERE {primary} = :{primary}",
            table = self.table,
            primary = self.primary
        )
    }
}
