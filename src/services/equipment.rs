//! Equipment service

use uuid::Uuid;

use crate::{
    config::AccessConfig,
    error::AppResult,
    models::{
        equipment::{CreateEquipment, Equipment, EquipmentQuery, UpdateEquipment},
        user::UserClaims,
    },
    repository::Repository,
};

use super::{
    access::AccessGuard,
    revalidation::{RevalidationService, DASHBOARD, DASHBOARD_EQUIPMENT, DASHBOARD_MAINTENANCE},
};

#[derive(Clone)]
pub struct EquipmentService {
    repository: Repository,
    guard: AccessGuard,
    revalidation: RevalidationService,
    access: AccessConfig,
}

impl EquipmentService {
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

    /// List equipment in the caller's scope
    pub async fn list(&self, claims: &UserClaims, query: &EquipmentQuery) -> AppResult<(Vec<Equipment>, i64)> {
        let scope = claims.list_scope(query.department_id.as_deref())?;
        self.repository.equipment.search(scope.as_deref(), query).await
    }

    pub async fn get_by_id(&self, claims: &UserClaims, id: Uuid) -> AppResult<Equipment> {
        let equipment = self.repository.equipment.get_by_id(id).await?;
        if self.access.scope_reads_by_id {
            claims.require_department(&equipment.department_id)?;
        }
        Ok(equipment)
    }

    pub async fn create(&self, claims: &UserClaims, data: CreateEquipment) -> AppResult<Equipment> {
        let ctx = self.guard.resolve(claims, data.target_department()?).await?;
        let (fields, _) = data.check()?;

        let equipment = self
            .repository
            .equipment
            .create(ctx.department_id(), &fields)
            .await?;
        tracing::info!(
            equipment_id = %equipment.id,
            department_id = %equipment.department_id,
            "Equipment created"
        );
        self.revalidation.mark_stale([DASHBOARD_EQUIPMENT, DASHBOARD]).await;
        Ok(equipment)
    }

    /// Partial update; moving to another department requires access to both
    pub async fn update(&self, claims: &UserClaims, id: Uuid, data: UpdateEquipment) -> AppResult<Equipment> {
        let current = self.repository.equipment.get_by_id(id).await?;
        let mut ctx = self.guard.resolve(claims, &current.department_id).await?;

        if let Some(target) = data
            .department_id
            .as_deref()
            .map(str::trim)
            .filter(|target| !target.is_empty() && *target != current.department_id)
        {
            ctx = self.guard.resolve(claims, target).await?;
        }

        let fields = data.apply(&current)?;
        let equipment = self
            .repository
            .equipment
            .update(id, ctx.department_id(), &fields)
            .await?;
        tracing::info!(equipment_id = %id, "Equipment updated");
        self.revalidation.mark_stale([DASHBOARD_EQUIPMENT, DASHBOARD]).await;
        Ok(equipment)
    }

    pub async fn delete(&self, claims: &UserClaims, id: Uuid) -> AppResult<()> {
        let current = self.repository.equipment.get_by_id(id).await?;
        self.guard.resolve(claims, &current.department_id).await?;

        self.repository.equipment.delete(id).await?;
        tracing::info!(equipment_id = %id, "Equipment deleted");
        self.revalidation
            .mark_stale([DASHBOARD_EQUIPMENT, DASHBOARD_MAINTENANCE, DASHBOARD])
            .await;
        Ok(())
    }
}
