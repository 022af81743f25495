//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, ledger, hasher) expose typed errors built with
//! [`define_port_error`]; services map them into [`crate::domain::Error`].
//! Driving ports are what inbound adapters call.

mod macros;
pub(crate) use macros::define_port_error;

mod account_service;
mod audit_ledger;
mod complaint_command;
mod complaint_query;
mod complaint_repository;
mod identity_resolver;
mod password_hasher;
mod user_repository;

#[cfg(test)]
pub use account_service::MockAccountService;
pub use account_service::{AccountService, AuthSession};
#[cfg(test)]
pub use audit_ledger::MockAuditLedger;
pub use audit_ledger::{AuditLedger, AuditLedgerError};
#[cfg(test)]
pub use complaint_command::MockComplaintCommand;
pub use complaint_command::{AssignTechnicianRequest, ComplaintCommand, UpdateStatusRequest};
#[cfg(test)]
pub use complaint_query::MockComplaintQuery;
pub use complaint_query::{ComplaintDetails, ComplaintQuery};
#[cfg(test)]
pub use complaint_repository::MockComplaintRepository;
pub use complaint_repository::{AppliedChange, ComplaintRepository, ComplaintRepositoryError};
pub use identity_resolver::IdentityResolver;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserAccount, UserPersistenceError, UserRepository};
