//! Driven port for per-employee leave statistics.

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use super::RecordStoreError;

/// Aggregated leave usage for one (leave type, status, year) group.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct LeaveStat {
    /// Leave type of the group.
    pub leave_type_name: Option<String>,
    /// Number of leave applications in the group.
    pub total_leaves: i64,
    /// Sum of `TotalDays`; `None` when every row has no day count.
    pub total_days: Option<f64>,
    /// Approval status of the group.
    pub status: Option<String>,
    /// Leave year of the group.
    pub year: Option<String>,
}

/// Port for leave statistics.
#[async_trait]
pub trait LeaveStatsQuery: Send + Sync {
    /// Group the employee's leaves by type, status and year.
    ///
    /// Restricts to `year` when supplied. Groups are ordered by leave type.
    async fn leave_stats(
        &self,
        employee_id: &str,
        year: Option<&str>,
    ) -> Result<Vec<LeaveStat>, RecordStoreError>;
}

/// Fixture implementation reporting no leave history.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLeaveStatsQuery;

#[async_trait]
impl LeaveStatsQuery for FixtureLeaveStatsQuery {
    async fn leave_stats(
        &self,
        _employee_id: &str,
        _year: Option<&str>,
    ) -> Result<Vec<LeaveStat>, RecordStoreError> {
        Ok(Vec::new())
    }
}
