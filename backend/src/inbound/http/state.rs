//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{EntityRecords, LeaveStatsQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Generic record operations for every registered entity.
    pub records: Arc<dyn EntityRecords>,
    /// Per-employee leave statistics.
    pub leave_stats: Arc<dyn LeaveStatsQuery>,
}

impl HttpState {
    /// Bundle the record and leave statistics ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use payroll_backend::domain::RecordService;
    /// use payroll_backend::domain::ports::FixtureLeaveStatsQuery;
    /// use payroll_backend::inbound::http::state::HttpState;
    /// # use payroll_backend::outbound::persistence::{DbPool, DieselRecordStore};
    /// # async fn wire(pool: DbPool) {
    /// let service = RecordService::new(
    ///     Arc::new(DieselRecordStore::new(pool)),
    ///     Arc::new(DefaultClock),
    /// );
    /// let state = HttpState::new(Arc::new(service), Arc::new(FixtureLeaveStatsQuery));
    /// # let _ = state;
    /// # }
    /// ```
    pub fn new(records: Arc<dyn EntityRecords>, leave_stats: Arc<dyn LeaveStatsQuery>) -> Self {
        Self {
            records,
            leave_stats,
        }
    }
}
