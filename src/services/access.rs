//! Department resolution and authorization.
//!
//! Every department-scoped action starts here: the owning department is
//! looked up (or upserted from reference data on first use), then the
//! caller's role is checked against it. The result is a request-scoped
//! [`DepartmentContext`] handed down to the action.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    error::{AppError, AppResult},
    models::{department::{Department, DepartmentSeed}, user::UserClaims},
};

/// Lookup of department rows
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DepartmentDirectory: Send + Sync {
    async fn find(&self, id: &str) -> AppResult<Option<Department>>;

    /// Insert the reference row if it does not exist yet and return it
    async fn ensure_seeded(&self, seed: &DepartmentSeed) -> AppResult<Department>;
}

/// Caller session plus the department the action targets
#[derive(Debug, Clone)]
pub struct DepartmentContext {
    pub session: UserClaims,
    pub department: Department,
}

impl DepartmentContext {
    pub fn department_id(&self) -> &str {
        &self.department.id
    }
}

#[derive(Clone)]
pub struct AccessGuard {
    directory: Arc<dyn DepartmentDirectory>,
}

impl AccessGuard {
    pub fn new(directory: Arc<dyn DepartmentDirectory>) -> Self {
        Self { directory }
    }

    /// Resolve a department by id and authorize the caller for it
    pub async fn resolve(&self, session: &UserClaims, department_id: &str) -> AppResult<DepartmentContext> {
        let department = self
            .directory
            .find(department_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Department '{}' not found", department_id)))?;
        Self::authorize(session, department)
    }

    /// Resolve a reference department, creating its row on first use
    pub async fn resolve_seed(&self, session: &UserClaims, seed: &DepartmentSeed) -> AppResult<DepartmentContext> {
        let department = self.directory.ensure_seeded(seed).await?;
        Self::authorize(session, department)
    }

    fn authorize(session: &UserClaims, department: Department) -> AppResult<DepartmentContext> {
        session.require_department(&department.id)?;
        Ok(DepartmentContext {
            session: session.clone(),
            department,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{enums::Role, user::tests::claims};
    use crate::schemas::registry::CRI;
    use chrono::Utc;
    use mockall::predicate::eq;

    pub fn department(id: &str) -> Department {
        Department {
            id: id.to_string(),
            name: id.to_uppercase(),
            location: None,
            description: None,
            focal_person: None,
            contact: None,
            logo: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn guard_with(directory: MockDepartmentDirectory) -> AccessGuard {
        AccessGuard::new(Arc::new(directory))
    }

    #[tokio::test]
    async fn test_missing_department_is_not_found() {
        let mut directory = MockDepartmentDirectory::new();
        directory.expect_find().with(eq("nowhere")).returning(|_| Ok(None));

        let guard = guard_with(directory);
        let result = guard.resolve(&claims(Role::Admin, None), "nowhere").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_dept_head_of_other_department_is_forbidden() {
        let mut directory = MockDepartmentDirectory::new();
        directory
            .expect_find()
            .with(eq("rari"))
            .returning(|id| Ok(Some(department(id))));

        let guard = guard_with(directory);
        let result = guard.resolve(&claims(Role::DeptHead, Some("cri")), "rari").await;
        assert!(matches!(result, Err(AppError::Authorization(_))));
    }

    #[tokio::test]
    async fn test_admin_bypasses_department_check() {
        let mut directory = MockDepartmentDirectory::new();
        directory
            .expect_find()
            .returning(|id| Ok(Some(department(id))));

        let guard = guard_with(directory);
        let ctx = guard.resolve(&claims(Role::Admin, None), "rari").await.unwrap();
        assert_eq!(ctx.department_id(), "rari");
        assert_eq!(ctx.session.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_seeded_department_is_resolved_for_its_head() {
        let mut directory = MockDepartmentDirectory::new();
        directory
            .expect_ensure_seeded()
            .times(1)
            .returning(|seed| Ok(department(seed.id)));

        let guard = guard_with(directory);
        let ctx = guard
            .resolve_seed(&claims(Role::DeptHead, Some("cri")), &CRI)
            .await
            .unwrap();
        assert_eq!(ctx.department_id(), "cri");
    }

    #[tokio::test]
    async fn test_seeded_department_still_checks_role() {
        let mut directory = MockDepartmentDirectory::new();
        directory
            .expect_ensure_seeded()
            .returning(|seed| Ok(department(seed.id)));

        let guard = guard_with(directory);
        let result = guard
            .resolve_seed(&claims(Role::DeptHead, Some("rari")), &CRI)
            .await;
        assert!(matches!(result, Err(AppError::Authorization(_))));
    }
}
