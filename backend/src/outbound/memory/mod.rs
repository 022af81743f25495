//! In-memory adapters for running without PostgreSQL and for tests.
//!
//! One mutex guards every table, so each repository call is a single
//! critical section: a status change reads the prior status, updates the
//! complaint and appends the audit entry without another writer in between.
//! No `.await` happens while the lock is held.

use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    AppliedChange, AuditLedger, AuditLedgerError, ComplaintRepository, ComplaintRepositoryError,
    UserAccount, UserPersistenceError, UserRepository,
};
use crate::domain::{
    AccessScope, Complaint, ComplaintFilter, ComplaintId, EmailAddress, HistoryEntry,
    NewHistoryEntry, Role, StatusChange, User, UserId, newest_first,
};

/// Category ids seeded by the initial migration.
pub const SEEDED_CATEGORIES: RangeInclusive<i32> = 1..=6;

const POISONED: &str = "in-memory store lock poisoned";

#[derive(Default)]
struct Tables {
    users: HashMap<UserId, UserAccount>,
    complaints: Vec<Complaint>,
    history: Vec<HistoryEntry>,
    last_history_id: i64,
}

impl Tables {
    fn append(&mut self, entry: NewHistoryEntry) -> HistoryEntry {
        self.last_history_id += 1;
        let stored = entry.recorded(self.last_history_id);
        self.history.push(stored.clone());
        stored
    }
}

/// Shared in-memory store implementing the user, complaint and ledger ports.
///
/// Clones share the same tables.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, String> {
        self.tables.lock().map_err(|_| POISONED.to_owned())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, user: &User, password_hash: &str) -> Result<(), UserPersistenceError> {
        let mut tables = self.lock().map_err(UserPersistenceError::query)?;
        for existing in tables.users.values() {
            if existing.user.email() == user.email() {
                return Err(UserPersistenceError::duplicate("email"));
            }
            if existing.user.username() == user.username() {
                return Err(UserPersistenceError::duplicate("username"));
            }
        }
        tables.users.insert(
            user.id(),
            UserAccount {
                user: user.clone(),
                password_hash: password_hash.to_owned(),
            },
        );
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let tables = self.lock().map_err(UserPersistenceError::query)?;
        Ok(tables.users.get(id).map(|account| account.user.clone()))
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let tables = self.lock().map_err(UserPersistenceError::query)?;
        Ok(tables
            .users
            .values()
            .find(|account| account.user.email() == email)
            .cloned())
    }

    async fn list_by_role(&self, role: Role) -> Result<Vec<User>, UserPersistenceError> {
        let tables = self.lock().map_err(UserPersistenceError::query)?;
        let mut users: Vec<User> = tables
            .users
            .values()
            .filter(|account| account.user.role() == role)
            .map(|account| account.user.clone())
            .collect();
        users.sort_by(|a, b| a.full_name().as_str().cmp(b.full_name().as_str()));
        Ok(users)
    }
}

#[async_trait]
impl ComplaintRepository for InMemoryStore {
    async fn create(
        &self,
        complaint: &Complaint,
        entry: &NewHistoryEntry,
    ) -> Result<HistoryEntry, ComplaintRepositoryError> {
        let category = complaint.category_id().get();
        if !SEEDED_CATEGORIES.contains(&category) {
            return Err(ComplaintRepositoryError::unknown_category(category));
        }
        let mut tables = self.lock().map_err(ComplaintRepositoryError::query)?;
        tables.complaints.push(complaint.clone());
        Ok(tables.append(entry.clone()))
    }

    async fn find(
        &self,
        id: &ComplaintId,
        scope: &AccessScope,
    ) -> Result<Option<Complaint>, ComplaintRepositoryError> {
        let tables = self.lock().map_err(ComplaintRepositoryError::query)?;
        Ok(tables
            .complaints
            .iter()
            .find(|complaint| complaint.id() == *id && scope.permits(complaint))
            .cloned())
    }

    async fn list(
        &self,
        scope: &AccessScope,
        filter: &ComplaintFilter,
    ) -> Result<Vec<Complaint>, ComplaintRepositoryError> {
        let tables = self.lock().map_err(ComplaintRepositoryError::query)?;
        let mut listed: Vec<Complaint> = tables
            .complaints
            .iter()
            .rev()
            .filter(|complaint| scope.permits(complaint) && filter.matches(complaint))
            .cloned()
            .collect();
        listed.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(listed)
    }

    async fn apply_change(
        &self,
        change: &StatusChange,
        scope: &AccessScope,
    ) -> Result<Option<AppliedChange>, ComplaintRepositoryError> {
        let mut tables = self.lock().map_err(ComplaintRepositoryError::query)?;
        let Some(complaint) = tables
            .complaints
            .iter_mut()
            .find(|complaint| complaint.id() == change.complaint_id && scope.permits(complaint))
        else {
            return Ok(None);
        };
        let entry = change
            .audit_entry(complaint.status())
            .map_err(|err| ComplaintRepositoryError::transition_rejected(err.to_string()))?;
        complaint.apply(change);
        let complaint = complaint.clone();
        let entry = tables.append(entry);
        Ok(Some(AppliedChange { complaint, entry }))
    }
}

#[async_trait]
impl AuditLedger for InMemoryStore {
    async fn list_for(
        &self,
        complaint_id: &ComplaintId,
    ) -> Result<Vec<HistoryEntry>, AuditLedgerError> {
        let tables = self.lock().map_err(AuditLedgerError::query)?;
        let mut entries: Vec<HistoryEntry> = tables
            .history
            .iter()
            .filter(|entry| entry.complaint_id() == *complaint_id)
            .cloned()
            .collect();
        newest_first(&mut entries);
        Ok(entries)
    }
}
