//! PostgreSQL-backed audit ledger reads.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AuditLedger, AuditLedgerError};
use crate::domain::{ComplaintId, HistoryEntry};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::HistoryRow;
use super::pool::DbPool;
use super::schema::complaint_history;

/// Reads `complaint_history` rows. Rows are written only by
/// [`super::DieselComplaintRepository`].
#[derive(Clone)]
pub struct DieselAuditLedger {
    pool: DbPool,
}

impl DieselAuditLedger {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditLedger for DieselAuditLedger {
    async fn list_for(
        &self,
        complaint_id: &ComplaintId,
    ) -> Result<Vec<HistoryEntry>, AuditLedgerError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, AuditLedgerError::connection))?;
        let rows: Vec<HistoryRow> = complaint_history::table
            .filter(complaint_history::complaint_id.eq(*complaint_id.as_uuid()))
            .order((
                complaint_history::changed_at.desc(),
                complaint_history::id.desc(),
            ))
            .select(HistoryRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| {
                map_basic_diesel_error(err, AuditLedgerError::query, AuditLedgerError::connection)
            })?;
        rows.into_iter()
            .map(|row| HistoryEntry::try_from(row).map_err(AuditLedgerError::query))
            .collect()
    }
}
