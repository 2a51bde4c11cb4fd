//! Startup seeding of reference departments and the bootstrap admin

use crate::{config::SeedConfig, error::AppResult, repository::Repository, schemas::DEPARTMENTS};

use super::users::UsersService;

#[derive(Clone)]
pub struct SeedService {
    repository: Repository,
    users: UsersService,
}

impl SeedService {
    pub fn new(repository: Repository, users: UsersService) -> Self {
        Self { repository, users }
    }

    /// Upsert every reference department, then make sure an admin exists.
    /// Existing rows are never modified, so running it twice is harmless.
    pub async fn run(&self, config: &SeedConfig) -> AppResult<()> {
        if !config.enabled {
            tracing::info!("Seeding disabled");
            return Ok(());
        }

        for seed in DEPARTMENTS.iter() {
            self.repository.departments.upsert_seed(seed).await?;
        }
        tracing::info!(count = DEPARTMENTS.len(), "Reference departments ensured");

        self.users.ensure_admin(config).await?;
        Ok(())
    }
}
