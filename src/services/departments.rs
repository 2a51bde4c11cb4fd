//! Department management service

use crate::{
    error::{AppError, AppResult},
    models::department::{CreateDepartment, Department, DepartmentSummary, UpdateDepartment},
    repository::Repository,
};
use validator::Validate;

use super::revalidation::{RevalidationService, DASHBOARD, DASHBOARD_DEPARTMENTS};

#[derive(Clone)]
pub struct DepartmentsService {
    repository: Repository,
    revalidation: RevalidationService,
}

impl DepartmentsService {
    pub fn new(repository: Repository, revalidation: RevalidationService) -> Self {
        Self {
            repository,
            revalidation,
        }
    }

    pub async fn list(&self) -> AppResult<Vec<DepartmentSummary>> {
        self.repository.departments.list().await
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<Department> {
        self.repository.departments.get_by_id(id).await
    }

    pub async fn create(&self, data: CreateDepartment) -> AppResult<Department> {
        data.check()?;

        if self.repository.departments.find_by_id(&data.id).await?.is_some() {
            return Err(AppError::Conflict(format!("Department '{}' already exists", data.id)));
        }
        if self.repository.departments.name_exists(data.name.trim(), None).await? {
            return Err(AppError::Conflict(format!(
                "A department named '{}' already exists",
                data.name.trim()
            )));
        }

        let department = self.repository.departments.create(&data).await?;
        tracing::info!(department_id = %department.id, "Department created");
        self.revalidation.mark_stale([DASHBOARD_DEPARTMENTS, DASHBOARD]).await;
        Ok(department)
    }

    pub async fn update(&self, id: &str, data: UpdateDepartment) -> AppResult<Department> {
        data.validate()?;
        self.repository.departments.get_by_id(id).await?;

        if let Some(ref name) = data.name {
            if self.repository.departments.name_exists(name.trim(), Some(id)).await? {
                return Err(AppError::Conflict(format!(
                    "A department named '{}' already exists",
                    name.trim()
                )));
            }
        }

        let department = self.repository.departments.update(id, &data).await?;
        tracing::info!(department_id = %department.id, "Department updated");
        self.revalidation.mark_stale([DASHBOARD_DEPARTMENTS, DASHBOARD]).await;
        Ok(department)
    }

    /// Delete a department that no longer owns anything
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.repository.departments.get_by_id(id).await?;
        self.repository
            .departments
            .usage(id)
            .await?
            .ensure_deletable(id)?;

        self.repository.departments.delete(id).await?;
        tracing::info!(department_id = %id, "Department deleted");
        self.revalidation.mark_stale([DASHBOARD_DEPARTMENTS, DASHBOARD]).await;
        Ok(())
    }
}
