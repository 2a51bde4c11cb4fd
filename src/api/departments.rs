//! Department endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::department::{CreateDepartment, Department, DepartmentSummary, UpdateDepartment},
    AppState,
};

use super::{ApiResponse, AuthenticatedUser};

/// List departments with what each one owns
#[utoipa::path(
    get,
    path = "/departments",
    tag = "departments",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Departments", body = Vec<DepartmentSummary>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_departments(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<ApiResponse<Vec<DepartmentSummary>>>> {
    let departments = state.services.departments.list().await?;
    Ok(ApiResponse::ok(departments))
}

#[utoipa::path(
    get,
    path = "/departments/{id}",
    tag = "departments",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Department slug")),
    responses(
        (status = 200, description = "Department", body = Department),
        (status = 404, description = "Department not found")
    )
)]
pub async fn get_department(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Department>>> {
    let department = state.services.departments.get_by_id(&id).await?;
    Ok(ApiResponse::ok(department))
}

#[utoipa::path(
    post,
    path = "/departments",
    tag = "departments",
    security(("bearer_auth" = [])),
    request_body = CreateDepartment,
    responses(
        (status = 201, description = "Department created", body = Department),
        (status = 403, description = "Administrator privileges required"),
        (status = 409, description = "Id or name already taken"),
        (status = 422, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_department(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateDepartment>,
) -> AppResult<(StatusCode, Json<ApiResponse<Department>>)> {
    claims.require_admin()?;

    let department = state.services.departments.create(data).await?;
    Ok(ApiResponse::created(department, "Department created"))
}

#[utoipa::path(
    put,
    path = "/departments/{id}",
    tag = "departments",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Department slug")),
    request_body = UpdateDepartment,
    responses(
        (status = 200, description = "Department updated", body = Department),
        (status = 404, description = "Department not found"),
        (status = 409, description = "Name already taken")
    )
)]
pub async fn update_department(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
    Json(data): Json<UpdateDepartment>,
) -> AppResult<Json<ApiResponse<Department>>> {
    claims.require_admin()?;

    let department = state.services.departments.update(&id, data).await?;
    Ok(ApiResponse::with_message(department, "Department updated"))
}

/// Delete a department; refused while it still owns equipment, records or users
#[utoipa::path(
    delete,
    path = "/departments/{id}",
    tag = "departments",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Department slug")),
    responses(
        (status = 200, description = "Department deleted"),
        (status = 404, description = "Department not found"),
        (status = 409, description = "Department still owns data", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_department(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    claims.require_admin()?;

    state.services.departments.delete(&id).await?;
    Ok(ApiResponse::message("Department deleted"))
}
