use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use pushkind_common::repository::errors::RepositoryResult;

use crate::domain::audit::{
    AuditEntry as DomainAuditEntry, AuditListQuery, NewAuditEntry as DomainNewAuditEntry,
};
use crate::models::audit::{AuditEntry as DbAuditEntry, NewAuditEntry as DbNewAuditEntry};
use crate::repository::{AuditReader, AuditWriter, DieselRepository, page_bounds};
use crate::schema::audit_logs;

fn filtered(query: &AuditListQuery) -> audit_logs::BoxedQuery<'static, Sqlite> {
    let mut items = audit_logs::table
        .filter(audit_logs::hub_id.eq(query.hub_id))
        .into_boxed::<Sqlite>();

    if let Some(entity) = query.entity.clone() {
        items = items.filter(audit_logs::entity.eq(entity));
    }

    items
}

impl AuditReader for DieselRepository {
    fn list_audit_entries(
        &self,
        query: AuditListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainAuditEntry>)> {
        let mut conn = self.conn()?;

        let total = filtered(&query).count().get_result::<i64>(&mut conn)? as usize;

        let mut items =
            filtered(&query).order((audit_logs::created_at.desc(), audit_logs::id.desc()));

        if let Some(pagination) = &query.pagination {
            let (offset, limit) = page_bounds(pagination.page, pagination.per_page);
            items = items.offset(offset).limit(limit);
        }

        let rows = items.load::<DbAuditEntry>(&mut conn)?;

        Ok((total, rows.into_iter().map(Into::into).collect()))
    }
}

impl AuditWriter for DieselRepository {
    fn record_audit_entry(&self, entry: &DomainNewAuditEntry) -> RepositoryResult<DomainAuditEntry> {
        let mut conn = self.conn()?;
        let insertable = DbNewAuditEntry::from(entry);

        let created = diesel::insert_into(audit_logs::table)
            .values(&insertable)
            .get_result::<DbAuditEntry>(&mut conn)?;

        Ok(created.into())
    }
}
