//! Dashboard statistics service

use crate::{
    error::AppResult,
    models::{
        enums::EquipmentStatus,
        stats::{DashboardStats, StatEntry, StatusBreakdown},
        user::UserClaims,
    },
    repository::Repository,
};

/// Number of recently added equipment rows on the dashboard
pub const RECENT_EQUIPMENT_LIMIT: i64 = 10;

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Statistics limited to what the caller may see
    pub async fn scoped(&self, claims: &UserClaims, department_id: Option<&str>) -> AppResult<DashboardStats> {
        let scope = claims.list_scope(department_id)?;
        self.compute(scope.as_deref()).await
    }

    /// Cross-department totals, shown to every authenticated user
    pub async fn overview(&self) -> AppResult<DashboardStats> {
        self.compute(None).await
    }

    /// Round trip to the database, for readiness checks
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.repository.pool).await?;
        Ok(())
    }

    async fn compute(&self, scope: Option<&str>) -> AppResult<DashboardStats> {
        let pool = &self.repository.pool;

        let status_rows: Vec<(EquipmentStatus, i64)> = sqlx::query_as(
            r#"
            SELECT status, COUNT(*)
            FROM equipment
            WHERE ($1::text IS NULL OR department_id = $1)
            GROUP BY status
            "#,
        )
        .bind(scope)
        .fetch_all(pool)
        .await?;
        let by_status = StatusBreakdown::from_counts(status_rows);

        let type_rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT equipment_type, COUNT(*) AS count
            FROM equipment
            WHERE ($1::text IS NULL OR department_id = $1)
            GROUP BY equipment_type
            ORDER BY count DESC, equipment_type ASC
            "#,
        )
        .bind(scope)
        .fetch_all(pool)
        .await?;

        let kind_rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT kind, COUNT(*)
            FROM department_records
            WHERE ($1::text IS NULL OR department_id = $1)
            GROUP BY kind
            ORDER BY kind
            "#,
        )
        .bind(scope)
        .fetch_all(pool)
        .await?;

        let recent_equipment = self
            .repository
            .equipment
            .recent(scope, RECENT_EQUIPMENT_LIMIT)
            .await?;
        let total_maintenance_cost = self.repository.maintenance.total_cost(scope).await?;

        Ok(DashboardStats {
            department_id: scope.map(str::to_string),
            total_equipment: by_status.total(),
            by_status,
            by_type: into_entries(type_rows),
            recent_equipment,
            total_maintenance_cost,
            records_by_kind: into_entries(kind_rows),
        })
    }
}

fn into_entries(rows: Vec<(String, i64)>) -> Vec<StatEntry> {
    rows.into_iter()
        .map(|(label, value)| StatEntry { label, value })
        .collect()
}
