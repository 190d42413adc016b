use rusqlite::{OptionalExtension as _, named_params};

use crate::database::FromRow as _;
use crate::rr::{DomainId, OwnerTag, RecordId, RecordStatus};

use super::{NewRecord, QueryBuilder, RecordTx, StoreError, StoredRecord};

#[derive(Debug, Clone)]
pub(crate) struct RecordPersistence<'c> {
    connection: &'c rusqlite::Connection,
}

impl<'c> RecordPersistence<'c> {
    pub(crate) fn new(connection: &'c rusqlite::Connection) -> Self {
        Self { connection }
    }

    const TABLE: QueryBuilder<9> = QueryBuilder {
        table: "domain_dns",
        columns: [
            "domain_dns_id",
            "domain_id",
            "alias_id",
            "domain_dns",
            "domain_class",
            "domain_type",
            "domain_text",
            "owned_by",
            "domain_dns_status",
        ],
        primary: "domain_dns_id",
    };

    /// Load a record together with the name of its domain or alias.
    #[tracing::instrument(skip_all, fields(record=%id), level = "trace")]
    pub(crate) fn get(
        &self,
        domain_id: DomainId,
        id: RecordId,
    ) -> rusqlite::Result<Option<StoredRecord>> {
        let query = format!(
            "SELECT {columns}, \
             IFNULL(domain_aliasses.alias_name, domain.domain_name) AS zone_name, \
             IFNULL(domain_aliasses.alias_status, domain.domain_status) AS zone_status \
             FROM {table} \
             LEFT JOIN domain ON domain.domain_id = {table}.domain_id \
             LEFT JOIN domain_aliasses ON domain_aliasses.alias_id = {table}.alias_id \
             WHERE {table}.domain_dns_id = :id AND {table}.domain_id = :domain_id",
            columns = Self::TABLE.qualified_columns(),
            table = Self::TABLE.table,
        );

        let mut stmt = self.connection.prepare(&query)?;
        stmt.query_row(
            named_params! { ":id": id, ":domain_id": domain_id },
            StoredRecord::from_row,
        )
        .optional()
    }

    #[tracing::instrument(skip_all, level = "trace")]
    pub(crate) fn insert_record(&self, record: &NewRecord) -> rusqlite::Result<RecordId> {
        let mut stmt = self.connection.prepare(&Self::TABLE.insert())?;
        stmt.execute(named_params! {
            ":domain_id": record.domain_id,
            ":alias_id": record.alias_id,
            ":domain_dns": record.name,
            ":domain_class": record.class,
            ":domain_type": record.record_type,
            ":domain_text": record.rdata,
            ":owned_by": OwnerTag::custom_dns(),
            ":domain_dns_status": RecordStatus::ToAdd,
        })?;

        let id = RecordId::new(self.connection.last_insert_rowid());
        tracing::trace!("inserted record {id}");
        Ok(id)
    }

    /// Only customer records of the record's main domain are updated.
    #[tracing::instrument(skip_all, fields(record=%id), level = "trace")]
    pub(crate) fn update_record(&self, id: RecordId, record: &NewRecord) -> rusqlite::Result<usize> {
        let query = format!(
            "{update} AND domain_id = :domain_id AND owned_by = :owned_by",
            update = Self::TABLE.update(&[
                "domain_dns",
                "domain_class",
                "domain_type",
                "domain_text",
                "domain_dns_status",
            ])
        );
        let mut stmt = self.connection.prepare(&query)?;
        let n = stmt.execute(named_params! {
            ":domain_dns_id": id,
            ":domain_id": record.domain_id,
            ":owned_by": OwnerTag::custom_dns(),
            ":domain_dns": record.name,
            ":domain_class": record.class,
            ":domain_type": record.record_type,
            ":domain_text": record.rdata,
            ":domain_dns_status": RecordStatus::ToChange,
        })?;
        tracing::trace!("updated {n} records");
        Ok(n)
    }

    #[tracing::instrument(skip_all, fields(domain=%domain_id), level = "trace")]
    pub(crate) fn resync_errored_records(&self, domain_id: DomainId) -> rusqlite::Result<usize> {
        let mut stmt = self.connection.prepare(&format!(
            "UPDATE {table} SET domain_dns_status = :tochange \
             WHERE domain_id = :domain_id \
             AND domain_dns_status NOT IN ('ok', 'toadd', 'tochange', 'todelete')",
            table = Self::TABLE.table
        ))?;
        let n = stmt.execute(named_params! {
            ":tochange": RecordStatus::ToChange,
            ":domain_id": domain_id,
        })?;
        tracing::trace!("rescheduled {n} records");
        Ok(n)
    }

    #[tracing::instrument(skip_all, fields(record=%id), level = "trace")]
    pub(crate) fn set_status(&self, id: RecordId, status: &RecordStatus) -> rusqlite::Result<usize> {
        let mut stmt = self
            .connection
            .prepare(&Self::TABLE.update(&["domain_dns_status"]))?;
        stmt.execute(named_params! { ":domain_dns_id": id, ":domain_dns_status": status })
    }
}

impl RecordTx for RecordPersistence<'_> {
    fn record(
        &self,
        domain_id: DomainId,
        record_id: RecordId,
    ) -> Result<Option<StoredRecord>, StoreError> {
        Ok(self.get(domain_id, record_id)?)
    }

    fn insert(&self, record: &NewRecord) -> Result<RecordId, StoreError> {
        Ok(self.insert_record(record)?)
    }

    fn update(&self, id: RecordId, record: &NewRecord) -> Result<(), StoreError> {
        match self.update_record(id, record)? {
            0 => Err(StoreError::UnknownRecord(id)),
            _ => Ok(()),
        }
    }

    fn resync_errored(&self, domain_id: DomainId) -> Result<usize, StoreError> {
        Ok(self.resync_errored_records(domain_id)?)
    }
}
