//! Maintenance log endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::maintenance::{CreateMaintenanceLog, MaintenanceLog, MaintenanceLogList, MaintenanceQuery},
    AppState,
};

use super::{ApiResponse, AuthenticatedUser};

/// Maintenance history of one equipment item, newest first
#[utoipa::path(
    get,
    path = "/equipment/{id}/maintenance",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Logs with their total cost", body = MaintenanceLogList),
        (status = 403, description = "Department not accessible"),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn list_equipment_logs(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<MaintenanceLogList>>> {
    let list = state.services.maintenance.list_for_equipment(&claims, id).await?;
    Ok(ApiResponse::ok(list))
}

#[utoipa::path(
    post,
    path = "/equipment/{id}/maintenance",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Equipment ID")),
    request_body = CreateMaintenanceLog,
    responses(
        (status = 201, description = "Log created", body = MaintenanceLog),
        (status = 403, description = "Department not accessible"),
        (status = 404, description = "Equipment not found"),
        (status = 422, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_log(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(data): Json<CreateMaintenanceLog>,
) -> AppResult<(StatusCode, Json<ApiResponse<MaintenanceLog>>)> {
    let log = state.services.maintenance.create(&claims, id, data).await?;
    Ok(ApiResponse::created(log, "Maintenance log created"))
}

/// Every log in the caller's scope
#[utoipa::path(
    get,
    path = "/maintenance",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(MaintenanceQuery),
    responses(
        (status = 200, description = "Logs with their total cost", body = MaintenanceLogList),
        (status = 403, description = "Department not accessible")
    )
)]
pub async fn list_logs(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<MaintenanceQuery>,
) -> AppResult<Json<ApiResponse<MaintenanceLogList>>> {
    let list = state
        .services
        .maintenance
        .list(&claims, query.department_id.as_deref())
        .await?;
    Ok(ApiResponse::ok(list))
}

#[utoipa::path(
    delete,
    path = "/maintenance/{id}",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Maintenance log ID")),
    responses(
        (status = 200, description = "Log deleted"),
        (status = 403, description = "Department not accessible"),
        (status = 404, description = "Log not found")
    )
)]
pub async fn delete_log(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.services.maintenance.delete(&claims, id).await?;
    Ok(ApiResponse::message("Maintenance log deleted"))
}
