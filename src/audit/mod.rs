//! Audit logging system for minibank
//!
//! Every create, update and delete of a persisted record is appended to
//! `audit.log` as one JSON line, with before/after snapshots and a short
//! human-readable diff for updates.

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
