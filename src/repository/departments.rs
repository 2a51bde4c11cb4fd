//! Departments repository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::department::{
        CreateDepartment, Department, DepartmentSeed, DepartmentSummary, DepartmentUsage,
        UpdateDepartment,
    },
    services::access::DepartmentDirectory,
};

#[derive(Clone)]
pub struct DepartmentsRepository {
    pool: Pool<Postgres>,
}

impl DepartmentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List departments with their ownership counts
    pub async fn list(&self) -> AppResult<Vec<DepartmentSummary>> {
        let rows = sqlx::query_as::<_, DepartmentSummary>(
            r#"
            SELECT d.*,
                   (SELECT COUNT(*) FROM equipment e WHERE e.department_id = d.id) AS equipment_count,
                   (SELECT COUNT(*) FROM department_records r WHERE r.department_id = d.id) AS record_count,
                   (SELECT COUNT(*) FROM users u WHERE u.department_id = d.id) AS user_count
            FROM departments d
            ORDER BY d.name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<Department>> {
        let row = sqlx::query_as::<_, Department>("SELECT * FROM departments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<Department> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Department '{}' not found", id)))
    }

    /// Check if a department name is taken (case-insensitive)
    pub async fn name_exists(&self, name: &str, exclude_id: Option<&str>) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM departments WHERE LOWER(name) = LOWER($1) AND ($2::text IS NULL OR id <> $2))",
        )
        .bind(name)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn create(&self, data: &CreateDepartment) -> AppResult<Department> {
        let row = sqlx::query_as::<_, Department>(
            r#"
            INSERT INTO departments (id, name, location, description, focal_person, contact, logo)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&data.id)
        .bind(data.name.trim())
        .bind(&data.location)
        .bind(&data.description)
        .bind(&data.focal_person)
        .bind(&data.contact)
        .bind(&data.logo)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Insert the reference row if absent and return the stored department.
    ///
    /// An existing row is left untouched, so admin edits survive restarts.
    pub async fn upsert_seed(&self, seed: &DepartmentSeed) -> AppResult<Department> {
        sqlx::query(
            r#"
            INSERT INTO departments (id, name, location, focal_person, contact)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(seed.id)
        .bind(seed.name)
        .bind(seed.location)
        .bind(seed.focal_person)
        .bind(seed.contact)
        .execute(&self.pool)
        .await?;

        self.get_by_id(seed.id).await
    }

    pub async fn update(&self, id: &str, data: &UpdateDepartment) -> AppResult<Department> {
        let now = Utc::now();
        let mut sets = vec!["updated_at = $1".to_string()];
        let mut idx = 2;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, idx));
                    idx += 1;
                }
            };
        }

        add_field!(data.name, "name");
        add_field!(data.location, "location");
        add_field!(data.description, "description");
        add_field!(data.focal_person, "focal_person");
        add_field!(data.contact, "contact");
        add_field!(data.logo, "logo");

        let query = format!(
            "UPDATE departments SET {} WHERE id = ${} RETURNING *",
            sets.join(", "),
            idx
        );

        let mut builder = sqlx::query_as::<_, Department>(&query).bind(now);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val.trim());
                }
            };
        }

        bind_field!(data.name);
        bind_field!(data.location);
        bind_field!(data.description);
        bind_field!(data.focal_person);
        bind_field!(data.contact);
        bind_field!(data.logo);

        builder
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Department '{}' not found", id)))
    }

    /// What the department still owns
    pub async fn usage(&self, id: &str) -> AppResult<DepartmentUsage> {
        let (equipment, records, users): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT (SELECT COUNT(*) FROM equipment WHERE department_id = $1),
                   (SELECT COUNT(*) FROM department_records WHERE department_id = $1),
                   (SELECT COUNT(*) FROM users WHERE department_id = $1)
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(DepartmentUsage {
            equipment,
            records,
            users,
        })
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM departments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Department '{}' not found", id)));
        }
        Ok(())
    }
}

#[async_trait]
impl DepartmentDirectory for DepartmentsRepository {
    async fn find(&self, id: &str) -> AppResult<Option<Department>> {
        self.find_by_id(id).await
    }

    async fn ensure_seeded(&self, seed: &DepartmentSeed) -> AppResult<Department> {
        self.upsert_seed(seed).await
    }
}
