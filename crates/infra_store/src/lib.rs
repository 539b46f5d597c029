//! Storage infrastructure
//!
//! Two interchangeable adapter families behind the domain repository
//! ports: an in-memory store for tests and single-process deployments,
//! and PostgreSQL repositories for production.
//!
//! Every state transition is applied as a conditional update. The memory
//! adapters run the aggregate method under the map's write lock; the
//! Postgres adapters re-run it against a `SELECT ... FOR UPDATE` snapshot
//! inside a transaction. Either way, two racing conflicting transitions
//! against the same row cannot both succeed.

pub mod error;
pub mod memory;
pub mod postgres;

pub use error::StoreError;
pub use memory::{MemoryBillStore, MemoryNotificationStore, MemoryRequestStore, MemoryReturnStore};
pub use postgres::{
    create_pool, DatabaseConfig, DatabasePool, PgBillStore, PgNotificationStore, PgRequestStore,
    PgReturnStore,
};
