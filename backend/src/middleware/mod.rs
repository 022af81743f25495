//! Request middleware.
//!
//! Purpose: attach a trace identifier to every request so log lines, error
//! envelopes and the `trace-id` response header can be correlated.

pub mod trace;

pub use trace::Trace;
