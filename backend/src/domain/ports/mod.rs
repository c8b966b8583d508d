//! Domain ports for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod entity_records;
mod leave_stats_query;
mod record_store;

#[cfg(test)]
pub use entity_records::MockEntityRecords;
pub use entity_records::EntityRecords;
pub use leave_stats_query::{FixtureLeaveStatsQuery, LeaveStat, LeaveStatsQuery};
#[cfg(test)]
pub use record_store::MockRecordStore;
pub use record_store::{ListQuery, RecordStore, RecordStoreError};
