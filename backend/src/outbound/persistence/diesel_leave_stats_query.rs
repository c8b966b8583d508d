//! PostgreSQL-backed `LeaveStatsQuery` implementation.

use async_trait::async_trait;
use diesel::sql_types::{BigInt, Double, Nullable, Text};
use diesel::{QueryableByName, sql_query};
use diesel_async::RunQueryDsl;

use crate::domain::ports::{LeaveStat, LeaveStatsQuery, RecordStoreError};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::pool::DbPool;

/// `$2` is NULL when no year restriction applies.
const LEAVE_STATS_SQL: &str = r#"
SELECT leave_type_name,
       COUNT(*) AS total_leaves,
       SUM(total_days) AS total_days,
       status,
       year
FROM employee_leaves
WHERE employee_id = $1
  AND ($2::text IS NULL OR year = $2)
GROUP BY leave_type_name, status, year
ORDER BY leave_type_name
"#;

#[derive(Debug, QueryableByName)]
struct LeaveStatRow {
    #[diesel(sql_type = Nullable<Text>)]
    leave_type_name: Option<String>,
    #[diesel(sql_type = BigInt)]
    total_leaves: i64,
    #[diesel(sql_type = Nullable<Double>)]
    total_days: Option<f64>,
    #[diesel(sql_type = Nullable<Text>)]
    status: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    year: Option<String>,
}

impl From<LeaveStatRow> for LeaveStat {
    fn from(row: LeaveStatRow) -> Self {
        Self {
            leave_type_name: row.leave_type_name,
            total_leaves: row.total_leaves,
            total_days: row.total_days,
            status: row.status,
            year: row.year,
        }
    }
}

/// Diesel-backed implementation of the [`LeaveStatsQuery`] port.
#[derive(Clone)]
pub struct DieselLeaveStatsQuery {
    pool: DbPool,
}

impl DieselLeaveStatsQuery {
    /// Create a new query adapter with the given connection pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LeaveStatsQuery for DieselLeaveStatsQuery {
    async fn leave_stats(
        &self,
        employee_id: &str,
        year: Option<&str>,
    ) -> Result<Vec<LeaveStat>, RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<LeaveStatRow> = sql_query(LEAVE_STATS_SQL)
            .bind::<Text, _>(employee_id)
            .bind::<Nullable<Text>, _>(year)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(LeaveStat::from).collect())
    }
}
