//! Department records service.
//!
//! One CRUD surface for every department schema. The schema decides the
//! owning department, the validation rules and the list ordering.

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::{
    config::AccessConfig,
    error::{AppError, AppResult},
    models::{
        record::{DepartmentRecord, RecordQuery},
        user::UserClaims,
    },
    repository::Repository,
    schemas::{find_schema, validate_create, validate_update, EntitySchema},
};

use super::{
    access::AccessGuard,
    revalidation::{RevalidationService, DASHBOARD},
};

#[derive(Clone)]
pub struct RecordsService {
    repository: Repository,
    guard: AccessGuard,
    revalidation: RevalidationService,
    access: AccessConfig,
}

impl RecordsService {
    pub fn new(
        repository: Repository,
        guard: AccessGuard,
        revalidation: RevalidationService,
        access: AccessConfig,
    ) -> Self {
        Self {
            repository,
            guard,
            revalidation,
            access,
        }
    }

    /// Look up a schema by kind
    pub fn schema(&self, kind: &str) -> AppResult<&'static EntitySchema> {
        find_schema(kind).ok_or_else(|| AppError::NotFound(format!("Unknown record type '{}'", kind)))
    }

    pub async fn list(
        &self,
        claims: &UserClaims,
        schema: &EntitySchema,
        query: &RecordQuery,
    ) -> AppResult<(Vec<DepartmentRecord>, i64)> {
        let ctx = self.guard.resolve_seed(claims, schema.department).await?;
        self.repository
            .records
            .search(schema.kind, ctx.department_id(), schema.ordering, query)
            .await
    }

    pub async fn get_by_id(&self, claims: &UserClaims, schema: &EntitySchema, id: Uuid) -> AppResult<DepartmentRecord> {
        let record = self.repository.records.get_by_id(schema.kind, id).await?;
        if self.access.scope_reads_by_id {
            claims.require_department(&record.department_id)?;
        }
        Ok(record)
    }

    pub async fn create(
        &self,
        claims: &UserClaims,
        schema: &EntitySchema,
        payload: &Map<String, Value>,
    ) -> AppResult<DepartmentRecord> {
        let ctx = self.guard.resolve_seed(claims, schema.department).await?;
        let validated = validate_create(schema, payload)?;

        let record = self
            .repository
            .records
            .create(schema.kind, ctx.department_id(), &validated)
            .await?;
        tracing::info!(kind = schema.kind, record_id = %record.id, "Record created");
        self.revalidation.mark_stale([schema.dashboard_path(), DASHBOARD.to_string()]).await;
        Ok(record)
    }

    /// Partial update merged over the stored attributes
    pub async fn update(
        &self,
        claims: &UserClaims,
        schema: &EntitySchema,
        id: Uuid,
        payload: &Map<String, Value>,
    ) -> AppResult<DepartmentRecord> {
        let existing = self.repository.records.get_by_id(schema.kind, id).await?;
        self.guard.resolve(claims, &existing.department_id).await?;
        let validated = validate_update(schema, &existing.attribute_map(), payload)?;

        let record = self.repository.records.update(schema.kind, id, &validated).await?;
        tracing::info!(kind = schema.kind, record_id = %id, "Record updated");
        self.revalidation.mark_stale([schema.dashboard_path(), DASHBOARD.to_string()]).await;
        Ok(record)
    }

    pub async fn delete(&self, claims: &UserClaims, schema: &EntitySchema, id: Uuid) -> AppResult<()> {
        let existing = self.repository.records.get_by_id(schema.kind, id).await?;
        self.guard.resolve(claims, &existing.department_id).await?;

        self.repository.records.delete(schema.kind, id).await?;
        tracing::info!(kind = schema.kind, record_id = %id, "Record deleted");
        self.revalidation.mark_stale([schema.dashboard_path(), DASHBOARD.to_string()]).await;
        Ok(())
    }
}
