//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the record ports backed by PostgreSQL via
//! `diesel-async` and `bb8` connection pooling.
//!
//! - **Descriptor-driven**: statements are assembled from entity
//!   descriptors; there are no per-entity schema or model modules.
//! - **Scoped connections**: each call checks out one pooled connection and
//!   returns it on drop.
//! - **Typed errors**: pool and Diesel failures map to
//!   [`RecordStoreError`](crate::domain::ports::RecordStoreError).
//!
//! # Example
//!
//! ```no_run
//! use payroll_backend::outbound::persistence::{DbPool, DieselRecordStore, PoolConfig};
//!
//! # async fn wire() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/payroll")).await?;
//! let store = DieselRecordStore::new(pool);
//! # let _ = store;
//! # Ok(())
//! # }
//! ```

mod diesel_leave_stats_query;
mod diesel_record_store;
mod error_mapping;
mod migrations;
mod pool;
mod statement;

pub use diesel_leave_stats_query::DieselLeaveStatsQuery;
pub use diesel_record_store::DieselRecordStore;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
