//! Equipment bulk import service

use crate::{
    config::ImportConfig,
    error::{AppError, AppResult, FieldErrors},
    import::parse_equipment_csv,
    models::{
        import_report::{ImportReport, RowError},
        user::UserClaims,
    },
    repository::Repository,
};

use super::{
    access::AccessGuard,
    revalidation::{RevalidationService, DASHBOARD, DASHBOARD_EQUIPMENT},
};

#[derive(Clone)]
pub struct ImportService {
    repository: Repository,
    guard: AccessGuard,
    revalidation: RevalidationService,
    config: ImportConfig,
}

impl ImportService {
    pub fn new(
        repository: Repository,
        guard: AccessGuard,
        revalidation: RevalidationService,
        config: ImportConfig,
    ) -> Self {
        Self {
            repository,
            guard,
            revalidation,
            config,
        }
    }

    /// Import an equipment sheet into one department.
    ///
    /// Rows are persisted one at a time; a row that fails validation or
    /// insertion is reported and the rest of the file still goes in.
    pub async fn import_equipment(
        &self,
        claims: &UserClaims,
        department_id: &str,
        data: &[u8],
    ) -> AppResult<ImportReport> {
        let department_id = department_id.trim();
        if department_id.is_empty() {
            return Err(FieldErrors::single("departmentId", "Department is required").into());
        }
        let ctx = self.guard.resolve(claims, department_id).await?;

        let parsed = parse_equipment_csv(data, self.config.max_rows)?;
        let mut errors = parsed.errors;
        let mut created = 0;

        for row in &parsed.valid {
            match self
                .repository
                .equipment
                .create(ctx.department_id(), &row.fields)
                .await
            {
                Ok(_) => created += 1,
                Err(e) => {
                    tracing::warn!(row = row.row, error = %e, "Import row could not be saved");
                    errors.push(RowError::failed(row.row, row_failure_message(&e)));
                }
            }
        }

        tracing::info!(
            department_id = %ctx.department_id(),
            total = parsed.total_rows,
            created,
            rejected = errors.len(),
            "Equipment import finished"
        );
        if created > 0 {
            self.revalidation.mark_stale([DASHBOARD_EQUIPMENT, DASHBOARD]).await;
        }

        Ok(ImportReport::new(ctx.department.id, parsed.total_rows, created, errors))
    }
}

fn row_failure_message(error: &AppError) -> String {
    match error {
        AppError::Database(_) | AppError::Internal(_) => "Could not save this row".to_string(),
        other => other.to_string(),
    }
}
