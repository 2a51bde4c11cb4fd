//! Maintenance logs repository

use rust_decimal::Decimal;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::maintenance::{MaintenanceLog, NewMaintenanceLog},
};

const SELECT_LOGS: &str = r#"
    SELECT m.id, m.equipment_id, e.name AS equipment_name, e.department_id,
           m.log_date, m.cost, m.description, m.created_at
    FROM maintenance_logs m
    JOIN equipment e ON e.id = m.equipment_id
"#;

#[derive(Clone)]
pub struct MaintenanceRepository {
    pool: Pool<Postgres>,
}

impl MaintenanceRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Logs of one equipment item, newest first
    pub async fn list_for_equipment(&self, equipment_id: Uuid) -> AppResult<Vec<MaintenanceLog>> {
        let query = format!(
            "{} WHERE m.equipment_id = $1 ORDER BY m.log_date DESC, m.created_at DESC",
            SELECT_LOGS
        );
        let rows = sqlx::query_as::<_, MaintenanceLog>(&query)
            .bind(equipment_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Logs across all equipment in an optional department scope
    pub async fn list(&self, scope: Option<&str>) -> AppResult<Vec<MaintenanceLog>> {
        let query = format!(
            "{} WHERE ($1::text IS NULL OR e.department_id = $1) ORDER BY m.log_date DESC, m.created_at DESC",
            SELECT_LOGS
        );
        let rows = sqlx::query_as::<_, MaintenanceLog>(&query)
            .bind(scope)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<MaintenanceLog> {
        let query = format!("{} WHERE m.id = $1", SELECT_LOGS);
        sqlx::query_as::<_, MaintenanceLog>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Maintenance log {} not found", id)))
    }

    pub async fn create(&self, equipment_id: Uuid, data: &NewMaintenanceLog) -> AppResult<MaintenanceLog> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO maintenance_logs (id, equipment_id, log_date, cost, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(equipment_id)
        .bind(data.log_date)
        .bind(data.cost)
        .bind(&data.description)
        .fetch_one(&self.pool)
        .await?;

        self.get_by_id(id).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM maintenance_logs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Maintenance log {} not found", id)));
        }
        Ok(())
    }

    /// Sum of maintenance costs in an optional department scope
    pub async fn total_cost(&self, scope: Option<&str>) -> AppResult<Decimal> {
        let total: Decimal = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(m.cost), 0)
            FROM maintenance_logs m
            JOIN equipment e ON e.id = m.equipment_id
            WHERE ($1::text IS NULL OR e.department_id = $1)
            "#,
        )
        .bind(scope)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }
}
