//! SQLite-backed implementation of
//! [`remembrance_domain::ports::store::PatternStorePort`]: patterns,
//! healed variants, healing stats, debug patterns, and the audit log,
//! plus pre-mutation JSON backups.

mod backup;
mod row;
mod schema;
mod sqlite_store;

pub use sqlite_store::{SqliteStore, StoreLocation};
