//! Equipment repository

use chrono::Utc;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        equipment::{Equipment, EquipmentFields, EquipmentQuery},
        PageWindow,
    },
};

const SELECT_EQUIPMENT: &str = r#"
    SELECT e.id, e.name, e.equipment_type, e.status, e.purchase_date, e.image_url,
           e.department_id, d.name AS department_name, e.created_at, e.updated_at
    FROM equipment e
    LEFT JOIN departments d ON d.id = e.department_id
"#;

#[derive(Clone)]
pub struct EquipmentRepository {
    pool: Pool<Postgres>,
}

impl EquipmentRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Search equipment within an optional department scope
    pub async fn search(
        &self,
        scope: Option<&str>,
        query: &EquipmentQuery,
    ) -> AppResult<(Vec<Equipment>, i64)> {
        let window = PageWindow::new(query.page, query.per_page);

        let mut conditions = Vec::new();
        let mut params: Vec<String> = Vec::new();

        if let Some(department_id) = scope {
            params.push(department_id.to_string());
            conditions.push(format!("e.department_id = ${}", params.len()));
        }

        if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            params.push(format!("%{}%", search.to_lowercase()));
            conditions.push(format!(
                "(LOWER(e.name) LIKE ${} OR LOWER(e.equipment_type) LIKE ${})",
                params.len(),
                params.len()
            ));
        }

        if let Some(status) = query.status {
            params.push(status.as_str().to_string());
            conditions.push(format!("e.status = ${}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_query = format!("SELECT COUNT(*) FROM equipment e {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_query);
        for param in &params {
            count_builder = count_builder.bind(param);
        }
        let total = count_builder.fetch_one(&self.pool).await?;

        let select_query = format!(
            "{} {} ORDER BY e.created_at DESC LIMIT {} OFFSET {}",
            SELECT_EQUIPMENT,
            where_clause,
            window.per_page,
            window.offset()
        );
        let mut select_builder = sqlx::query_as::<_, Equipment>(&select_query);
        for param in &params {
            select_builder = select_builder.bind(param);
        }
        let rows = select_builder.fetch_all(&self.pool).await?;

        Ok((rows, total))
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Equipment> {
        let query = format!("{} WHERE e.id = $1", SELECT_EQUIPMENT);
        sqlx::query_as::<_, Equipment>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    /// Most recently added equipment, for the dashboard
    pub async fn recent(&self, scope: Option<&str>, limit: i64) -> AppResult<Vec<Equipment>> {
        let query = format!(
            "{} WHERE ($1::text IS NULL OR e.department_id = $1) ORDER BY e.created_at DESC LIMIT $2",
            SELECT_EQUIPMENT
        );
        let rows = sqlx::query_as::<_, Equipment>(&query)
            .bind(scope)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn create(&self, department_id: &str, data: &EquipmentFields) -> AppResult<Equipment> {
        let row = sqlx::query_as::<_, Equipment>(
            r#"
            WITH inserted AS (
                INSERT INTO equipment (id, name, equipment_type, status, purchase_date, image_url, department_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING *
            )
            SELECT i.id, i.name, i.equipment_type, i.status, i.purchase_date, i.image_url,
                   i.department_id, d.name AS department_name, i.created_at, i.updated_at
            FROM inserted i
            LEFT JOIN departments d ON d.id = i.department_id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&data.name)
        .bind(&data.equipment_type)
        .bind(data.status)
        .bind(data.purchase_date)
        .bind(&data.image_url)
        .bind(department_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Overwrite every editable column with already-validated values
    pub async fn update(
        &self,
        id: Uuid,
        department_id: &str,
        data: &EquipmentFields,
    ) -> AppResult<Equipment> {
        sqlx::query_as::<_, Equipment>(
            r#"
            WITH updated AS (
                UPDATE equipment
                SET name = $1, equipment_type = $2, status = $3, purchase_date = $4,
                    image_url = $5, department_id = $6, updated_at = $7
                WHERE id = $8
                RETURNING *
            )
            SELECT u.id, u.name, u.equipment_type, u.status, u.purchase_date, u.image_url,
                   u.department_id, d.name AS department_name, u.created_at, u.updated_at
            FROM updated u
            LEFT JOIN departments d ON d.id = u.department_id
            "#,
        )
        .bind(&data.name)
        .bind(&data.equipment_type)
        .bind(data.status)
        .bind(data.purchase_date)
        .bind(&data.image_url)
        .bind(department_id)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    /// Delete equipment; its maintenance logs go with it
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM equipment WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Equipment {} not found", id)));
        }
        Ok(())
    }
}
