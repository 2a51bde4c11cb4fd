//! Department records repository, shared by every entity schema

use chrono::Utc;
use sqlx::{types::Json, Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        record::{DepartmentRecord, RecordQuery},
        PageWindow,
    },
    schemas::{RecordOrdering, ValidatedRecord},
};

const SELECT_RECORDS: &str = r#"
    SELECT r.id, r.kind, r.department_id, d.name AS department_name, r.name, r.status,
           r.display_order, r.attributes, r.created_at, r.updated_at
    FROM department_records r
    LEFT JOIN departments d ON d.id = r.department_id
"#;

#[derive(Clone)]
pub struct RecordsRepository {
    pool: Pool<Postgres>,
}

impl RecordsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List records of one kind inside one department
    pub async fn search(
        &self,
        kind: &str,
        department_id: &str,
        ordering: RecordOrdering,
        query: &RecordQuery,
    ) -> AppResult<(Vec<DepartmentRecord>, i64)> {
        let window = PageWindow::new(query.page, query.per_page);

        let mut conditions = vec!["r.kind = $1".to_string(), "r.department_id = $2".to_string()];
        let mut params: Vec<String> = vec![kind.to_string(), department_id.to_string()];

        if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            params.push(format!("%{}%", search.to_lowercase()));
            conditions.push(format!("LOWER(r.name) LIKE ${}", params.len()));
        }

        if let Some(status) = query.status {
            params.push(status.as_str().to_string());
            conditions.push(format!("r.status = ${}", params.len()));
        }

        let where_clause = format!("WHERE {}", conditions.join(" AND "));

        let count_query = format!("SELECT COUNT(*) FROM department_records r {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_query);
        for param in &params {
            count_builder = count_builder.bind(param);
        }
        let total = count_builder.fetch_one(&self.pool).await?;

        let order_by = match ordering {
            RecordOrdering::DisplayOrder => "r.display_order ASC NULLS LAST, r.created_at DESC",
            RecordOrdering::Recent => "r.created_at DESC",
        };

        let select_query = format!(
            "{} {} ORDER BY {} LIMIT {} OFFSET {}",
            SELECT_RECORDS,
            where_clause,
            order_by,
            window.per_page,
            window.offset()
        );
        let mut select_builder = sqlx::query_as::<_, DepartmentRecord>(&select_query);
        for param in &params {
            select_builder = select_builder.bind(param);
        }
        let rows = select_builder.fetch_all(&self.pool).await?;

        Ok((rows, total))
    }

    /// Get a record of the given kind
    pub async fn get_by_id(&self, kind: &str, id: Uuid) -> AppResult<DepartmentRecord> {
        let query = format!("{} WHERE r.id = $1 AND r.kind = $2", SELECT_RECORDS);
        sqlx::query_as::<_, DepartmentRecord>(&query)
            .bind(id)
            .bind(kind)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Record {} not found", id)))
    }

    pub async fn create(
        &self,
        kind: &str,
        department_id: &str,
        data: &ValidatedRecord,
    ) -> AppResult<DepartmentRecord> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO department_records (id, kind, department_id, name, status, display_order, attributes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(kind)
        .bind(department_id)
        .bind(&data.name)
        .bind(data.status)
        .bind(data.display_order)
        .bind(Json(&data.attributes))
        .fetch_one(&self.pool)
        .await?;

        self.get_by_id(kind, id).await
    }

    /// Replace a record's columns with an already-merged, validated copy
    pub async fn update(&self, kind: &str, id: Uuid, data: &ValidatedRecord) -> AppResult<DepartmentRecord> {
        let result = sqlx::query(
            r#"
            UPDATE department_records
            SET name = $1, status = $2, display_order = $3, attributes = $4, updated_at = $5
            WHERE id = $6 AND kind = $7
            "#,
        )
        .bind(&data.name)
        .bind(data.status)
        .bind(data.display_order)
        .bind(Json(&data.attributes))
        .bind(Utc::now())
        .bind(id)
        .bind(kind)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Record {} not found", id)));
        }

        self.get_by_id(kind, id).await
    }

    pub async fn delete(&self, kind: &str, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM department_records WHERE id = $1 AND kind = $2")
            .bind(id)
            .bind(kind)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Record {} not found", id)));
        }
        Ok(())
    }
}
