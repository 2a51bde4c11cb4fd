//! Maintenance log service

use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        maintenance::{CreateMaintenanceLog, MaintenanceLog, MaintenanceLogList},
        user::UserClaims,
    },
    repository::Repository,
};

use super::{
    access::AccessGuard,
    revalidation::{RevalidationService, DASHBOARD, DASHBOARD_EQUIPMENT, DASHBOARD_MAINTENANCE},
};

#[derive(Clone)]
pub struct MaintenanceService {
    repository: Repository,
    guard: AccessGuard,
    revalidation: RevalidationService,
}

impl MaintenanceService {
    pub fn new(repository: Repository, guard: AccessGuard, revalidation: RevalidationService) -> Self {
        Self {
            repository,
            guard,
            revalidation,
        }
    }

    /// Logs of one equipment item, newest first, with their total cost
    pub async fn list_for_equipment(&self, claims: &UserClaims, equipment_id: Uuid) -> AppResult<MaintenanceLogList> {
        let equipment = self.repository.equipment.get_by_id(equipment_id).await?;
        claims.require_department(&equipment.department_id)?;

        let logs = self.repository.maintenance.list_for_equipment(equipment_id).await?;
        Ok(MaintenanceLogList::new(logs))
    }

    /// Logs across every equipment item in the caller's scope
    pub async fn list(&self, claims: &UserClaims, department_id: Option<&str>) -> AppResult<MaintenanceLogList> {
        let scope = claims.list_scope(department_id)?;
        let logs = self.repository.maintenance.list(scope.as_deref()).await?;
        Ok(MaintenanceLogList::new(logs))
    }

    /// Record maintenance; authorized against the equipment's department
    pub async fn create(
        &self,
        claims: &UserClaims,
        equipment_id: Uuid,
        data: CreateMaintenanceLog,
    ) -> AppResult<MaintenanceLog> {
        let equipment = self.repository.equipment.get_by_id(equipment_id).await?;
        self.guard.resolve(claims, &equipment.department_id).await?;
        let fields = data.check()?;

        let log = self.repository.maintenance.create(equipment_id, &fields).await?;
        tracing::info!(
            log_id = %log.id,
            equipment_id = %equipment_id,
            cost = %log.cost,
            "Maintenance logged"
        );
        self.revalidation
            .mark_stale([DASHBOARD_MAINTENANCE, DASHBOARD_EQUIPMENT, DASHBOARD])
            .await;
        Ok(log)
    }

    pub async fn delete(&self, claims: &UserClaims, id: Uuid) -> AppResult<()> {
        let log = self.repository.maintenance.get_by_id(id).await?;
        let equipment = self.repository.equipment.get_by_id(log.equipment_id).await?;
        self.guard.resolve(claims, &equipment.department_id).await?;

        self.repository.maintenance.delete(id).await?;
        tracing::info!(log_id = %id, "Maintenance log deleted");
        self.revalidation
            .mark_stale([DASHBOARD_MAINTENANCE, DASHBOARD_EQUIPMENT, DASHBOARD])
            .await;
        Ok(())
    }
}
