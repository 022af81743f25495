//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories are thin translators between Diesel rows and domain types;
//! row structs and table definitions stay private to this module. Queries run
//! on `diesel-async` connections checked out of a `bb8` pool.

mod diesel_audit_ledger;
mod diesel_basic_error_mapping;
mod diesel_complaint_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_audit_ledger::DieselAuditLedger;
pub use diesel_complaint_repository::DieselComplaintRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
