//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, departments, equipment, health, maintenance, records, revalidation, stats, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Agricultural University Inventory API",
        version = "1.0.0",
        description = "Department equipment, asset and maintenance inventory REST API"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        // Users
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::delete_user,
        // Departments
        departments::list_departments,
        departments::get_department,
        departments::create_department,
        departments::update_department,
        departments::delete_department,
        // Equipment
        equipment::list_equipment,
        equipment::get_equipment,
        equipment::create_equipment,
        equipment::update_equipment,
        equipment::delete_equipment,
        equipment::import_equipment,
        // Maintenance
        maintenance::list_equipment_logs,
        maintenance::create_log,
        maintenance::list_logs,
        maintenance::delete_log,
        // Department records
        records::list_schemas,
        records::get_schema,
        records::list_records,
        records::get_record,
        records::create_record,
        records::update_record,
        records::delete_record,
        // Stats
        stats::get_stats,
        stats::get_overview,
        // Revalidation
        revalidation::list_stale,
        revalidation::stream_stale,
    ),
    components(
        schemas(
            // Auth & users
            auth::LoginRequest,
            auth::LoginResponse,
            crate::models::user::User,
            crate::models::user::CreateUser,
            crate::models::user::UpdateUser,
            crate::models::enums::Role,
            // Departments
            crate::models::department::Department,
            crate::models::department::DepartmentSummary,
            crate::models::department::CreateDepartment,
            crate::models::department::UpdateDepartment,
            // Equipment
            crate::models::equipment::Equipment,
            crate::models::equipment::CreateEquipment,
            crate::models::equipment::UpdateEquipment,
            crate::models::enums::EquipmentStatus,
            equipment::ImportUpload,
            crate::models::import_report::ImportReport,
            crate::models::import_report::RowError,
            // Maintenance
            crate::models::maintenance::MaintenanceLog,
            crate::models::maintenance::MaintenanceLogList,
            crate::models::maintenance::CreateMaintenanceLog,
            // Records
            crate::models::record::DepartmentRecord,
            crate::models::record::RecordPayload,
            records::SchemaDescriptor,
            records::FieldDescriptor,
            crate::schemas::FieldKind,
            crate::schemas::RecordOrdering,
            // Stats
            crate::models::stats::DashboardStats,
            crate::models::stats::StatEntry,
            stats::StatsQuery,
            // Revalidation
            crate::services::revalidation::StaleEvent,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
            crate::error::FieldErrors,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "users", description = "User management"),
        (name = "departments", description = "Departments"),
        (name = "equipment", description = "Equipment inventory and CSV import"),
        (name = "maintenance", description = "Equipment maintenance logs"),
        (name = "records", description = "Department-specific records"),
        (name = "stats", description = "Dashboard statistics"),
        (name = "revalidation", description = "Stale dashboard notifications")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_declares_bearer_auth_and_paths() {
        let doc = ApiDoc::openapi();
        let components = doc.components.as_ref().unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));
        assert!(doc.paths.paths.contains_key("/equipment/import"));
        assert!(doc.paths.paths.contains_key("/records/{kind}/{id}"));
    }
}
