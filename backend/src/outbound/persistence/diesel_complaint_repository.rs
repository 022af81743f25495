//! PostgreSQL-backed complaint repository.
//!
//! Status changes lock the complaint row with `SELECT ... FOR UPDATE`, then
//! update it and append the audit entry inside the same transaction, so two
//! concurrent updates can never record the same `old_status`.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{AppliedChange, ComplaintRepository, ComplaintRepositoryError};
use crate::domain::{
    AccessScope, CategoryId, Complaint, ComplaintFilter, ComplaintId, HistoryEntry,
    NewHistoryEntry, StatusChange, TransitionRejected,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{
    ComplaintRow, ComplaintStatusUpdate, HistoryRow, NewComplaintRow, NewHistoryRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{complaint_history, complaints};

/// Diesel-backed implementation of the complaint repository port.
#[derive(Clone)]
pub struct DieselComplaintRepository {
    pool: DbPool,
}

impl DieselComplaintRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Failure inside a complaint transaction; any variant rolls it back.
#[derive(Debug)]
enum TxError {
    Diesel(DieselError),
    Rejected(TransitionRejected),
    CorruptRow(String),
}

impl From<DieselError> for TxError {
    fn from(error: DieselError) -> Self {
        Self::Diesel(error)
    }
}

fn map_pool_error(error: PoolError) -> ComplaintRepositoryError {
    map_basic_pool_error(error, ComplaintRepositoryError::connection)
}

fn map_diesel_error(error: DieselError) -> ComplaintRepositoryError {
    map_basic_diesel_error(
        error,
        ComplaintRepositoryError::query,
        ComplaintRepositoryError::connection,
    )
}

/// Like [`map_diesel_error`], but reports a category foreign key violation
/// as an unknown category.
fn map_insert_error(error: DieselError, category: CategoryId) -> ComplaintRepositoryError {
    if let DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) = &error {
        if info
            .constraint_name()
            .is_some_and(|name| name.contains("category"))
        {
            return ComplaintRepositoryError::unknown_category(category.get());
        }
    }
    map_diesel_error(error)
}

fn map_tx_error(error: TxError) -> ComplaintRepositoryError {
    match error {
        TxError::Diesel(error) => map_diesel_error(error),
        TxError::Rejected(rejected) => {
            ComplaintRepositoryError::transition_rejected(rejected.to_string())
        }
        TxError::CorruptRow(message) => ComplaintRepositoryError::query(message),
    }
}

fn scoped(scope: &AccessScope) -> complaints::BoxedQuery<'static, Pg> {
    let query = complaints::table.into_boxed();
    match *scope {
        AccessScope::All => query,
        AccessScope::Submitter(id) => query.filter(complaints::user_id.eq(*id.as_uuid())),
        AccessScope::Assignee(id) => query.filter(complaints::technician_id.eq(*id.as_uuid())),
    }
}

fn to_domain(row: ComplaintRow) -> Result<Complaint, ComplaintRepositoryError> {
    Complaint::try_from(row).map_err(ComplaintRepositoryError::query)
}

#[async_trait]
impl ComplaintRepository for DieselComplaintRepository {
    async fn create(
        &self,
        complaint: &Complaint,
        entry: &NewHistoryEntry,
    ) -> Result<HistoryEntry, ComplaintRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = conn
            .transaction(|conn| {
                async move {
                    diesel::insert_into(complaints::table)
                        .values(NewComplaintRow::from(complaint))
                        .execute(conn)
                        .await?;
                    diesel::insert_into(complaint_history::table)
                        .values(NewHistoryRow::from(entry))
                        .returning(HistoryRow::as_returning())
                        .get_result::<HistoryRow>(conn)
                        .await
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| map_insert_error(err, complaint.category_id()))?;
        HistoryEntry::try_from(row).map_err(ComplaintRepositoryError::query)
    }

    async fn find(
        &self,
        id: &ComplaintId,
        scope: &AccessScope,
    ) -> Result<Option<Complaint>, ComplaintRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = scoped(scope)
            .filter(complaints::id.eq(*id.as_uuid()))
            .select(ComplaintRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(to_domain).transpose()
    }

    async fn list(
        &self,
        scope: &AccessScope,
        filter: &ComplaintFilter,
    ) -> Result<Vec<Complaint>, ComplaintRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = scoped(scope);
        if let Some(status) = filter.status {
            query = query.filter(complaints::status.eq(status.as_str()));
        }
        if let Some(category) = filter.category {
            query = query.filter(complaints::category_id.eq(category.get()));
        }
        let rows: Vec<ComplaintRow> = query
            .order(complaints::created_at.desc())
            .select(ComplaintRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(to_domain).collect()
    }

    async fn apply_change(
        &self,
        change: &StatusChange,
        scope: &AccessScope,
    ) -> Result<Option<AppliedChange>, ComplaintRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let complaint_id = *change.complaint_id.as_uuid();
        conn.transaction(|conn| {
            async move {
                let Some(row) = complaints::table
                    .find(complaint_id)
                    .select(ComplaintRow::as_select())
                    .for_update()
                    .first::<ComplaintRow>(conn)
                    .await
                    .optional()?
                else {
                    return Ok(None);
                };
                let mut complaint = Complaint::try_from(row).map_err(TxError::CorruptRow)?;
                if !scope.permits(&complaint) {
                    return Ok(None);
                }

                let entry = change
                    .audit_entry(complaint.status())
                    .map_err(TxError::Rejected)?;
                complaint.apply(change);

                diesel::update(complaints::table.find(complaint_id))
                    .set(ComplaintStatusUpdate::from(&complaint))
                    .execute(conn)
                    .await?;
                let stored = diesel::insert_into(complaint_history::table)
                    .values(NewHistoryRow::from(&entry))
                    .returning(HistoryRow::as_returning())
                    .get_result::<HistoryRow>(conn)
                    .await?;
                let entry = HistoryEntry::try_from(stored).map_err(TxError::CorruptRow)?;
                Ok(Some(AppliedChange { complaint, entry }))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_tx_error)
    }
}
