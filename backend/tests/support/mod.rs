//! Shared helpers for the backend integration suites.
//!
//! Each file under `backend/tests/` compiles as its own crate, so suites pull
//! these in with `mod support;` and use only what they need.

pub mod cluster_skip;
pub mod pg_embed;

pub use cluster_skip::handle_cluster_setup_failure;
pub use pg_embed::{EmbeddedDatabase, provision_database};
