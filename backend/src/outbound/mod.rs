//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed record store and leave statistics
//!   using Diesel ORM.
//!
//! Adapters translate between descriptor-driven domain values and SQL. They
//! contain no business logic.

pub mod persistence;
