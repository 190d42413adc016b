use rusqlite::{OptionalExtension as _, named_params};

use crate::database::FromRow as _;
use crate::rr::{AliasId, DomainId};

use super::{Alias, Domain, DomainChoice, QueryBuilder};

/// Alias status of an alias which was ordered but not yet approved.
const ORDERED: &str = "ordered";

#[derive(Debug, Clone)]
pub(crate) struct DomainPersistence<'c> {
    connection: &'c rusqlite::Connection,
}

impl<'c> DomainPersistence<'c> {
    pub(crate) fn new(connection: &'c rusqlite::Connection) -> Self {
        Self { connection }
    }

    const DOMAINS: QueryBuilder<3> = QueryBuilder {
        table: "domain",
        columns: ["domain_id", "domain_name", "domain_status"],
        primary: "domain_id",
    };

    const ALIASES: QueryBuilder<4> = QueryBuilder {
        table: "domain_aliasses",
        columns: ["alias_id", "domain_id", "alias_name", "alias_status"],
        primary: "alias_id",
    };

    #[tracing::instrument(skip_all, fields(domain=%id), level = "trace")]
    pub(crate) fn domain(&self, id: DomainId) -> rusqlite::Result<Option<Domain>> {
        let mut stmt = self
            .connection
            .prepare(&Self::DOMAINS.select("WHERE domain_id = :domain_id"))?;
        stmt.query_row(named_params! { ":domain_id": id }, Domain::from_row)
            .optional()
    }

    #[tracing::instrument(skip_all, fields(domain=%domain_id, alias=%alias_id), level = "trace")]
    pub(crate) fn alias(
        &self,
        domain_id: DomainId,
        alias_id: AliasId,
    ) -> rusqlite::Result<Option<Alias>> {
        let mut stmt = self.connection.prepare(
            &Self::ALIASES.select("WHERE alias_id = :alias_id AND domain_id = :domain_id"),
        )?;
        stmt.query_row(
            named_params! { ":alias_id": alias_id, ":domain_id": domain_id },
            Alias::from_row,
        )
        .optional()
    }

    #[tracing::instrument(skip_all, fields(domain=%domain_id), level = "trace")]
    pub(crate) fn choices(&self, domain_id: DomainId) -> rusqlite::Result<Vec<DomainChoice>> {
        let mut stmt = self.connection.prepare(
            "SELECT 0 AS id, domain_name AS name FROM domain WHERE domain_id = :domain_id \
             UNION ALL \
             SELECT alias_id AS id, alias_name AS name FROM domain_aliasses \
             WHERE domain_id = :domain_id AND alias_status <> :ordered \
             ORDER BY id",
        )?;

        let choices = stmt
            .query_map(
                named_params! { ":domain_id": domain_id, ":ordered": ORDERED },
                |row| {
                    Ok(DomainChoice {
                        id: row.get("id")?,
                        name: row.get("name")?,
                    })
                },
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(choices)
    }

    #[tracing::instrument(skip_all, level = "trace")]
    pub(crate) fn insert_domain(&self, name: &str) -> rusqlite::Result<DomainId> {
        let mut stmt = self.connection.prepare(&Self::DOMAINS.insert())?;
        stmt.execute(named_params! { ":domain_name": name, ":domain_status": "ok" })?;
        Ok(DomainId::new(self.connection.last_insert_rowid()))
    }

    #[tracing::instrument(skip_all, level = "trace")]
    pub(crate) fn insert_alias(
        &self,
        domain_id: DomainId,
        name: &str,
        status: &str,
    ) -> rusqlite::Result<AliasId> {
        let mut stmt = self.connection.prepare(&Self::ALIASES.insert())?;
        stmt.execute(named_params! {
            ":domain_id": domain_id,
            ":alias_name": name,
            ":alias_status": status,
        })?;
        Ok(AliasId::new(self.connection.last_insert_rowid()))
    }
}
