//! Business logic services

pub mod access;
pub mod departments;
pub mod equipment;
pub mod import;
pub mod maintenance;
pub mod records;
pub mod revalidation;
pub mod seed;
pub mod stats;
pub mod users;

use std::sync::Arc;

use crate::{config::AppConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub departments: departments::DepartmentsService,
    pub equipment: equipment::EquipmentService,
    pub maintenance: maintenance::MaintenanceService,
    pub records: records::RecordsService,
    pub import: import::ImportService,
    pub stats: stats::StatsService,
    pub seed: seed::SeedService,
    pub revalidation: revalidation::RevalidationService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, config: &AppConfig) -> Self {
        let revalidation = revalidation::RevalidationService::new();
        let guard = access::AccessGuard::new(Arc::new(repository.departments.clone()));
        let users = users::UsersService::new(repository.clone(), config.auth.clone(), revalidation.clone());

        Self {
            departments: departments::DepartmentsService::new(repository.clone(), revalidation.clone()),
            equipment: equipment::EquipmentService::new(
                repository.clone(),
                guard.clone(),
                revalidation.clone(),
                config.access.clone(),
            ),
            maintenance: maintenance::MaintenanceService::new(
                repository.clone(),
                guard.clone(),
                revalidation.clone(),
            ),
            records: records::RecordsService::new(
                repository.clone(),
                guard.clone(),
                revalidation.clone(),
                config.access.clone(),
            ),
            import: import::ImportService::new(
                repository.clone(),
                guard,
                revalidation.clone(),
                config.import.clone(),
            ),
            stats: stats::StatsService::new(repository.clone()),
            seed: seed::SeedService::new(repository, users.clone()),
            users,
            revalidation,
        }
    }
}
