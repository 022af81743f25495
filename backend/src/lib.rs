//! Complaint desk backend library.
//!
//! A ticketing service where students file facility complaints,
//! administrators assign them to technicians, and every status change is
//! recorded in an append-only history.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
