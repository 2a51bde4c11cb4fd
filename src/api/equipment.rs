//! Equipment endpoints, including the CSV bulk import

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::Multipart;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult, FieldErrors},
    models::{
        equipment::{CreateEquipment, Equipment, EquipmentQuery, UpdateEquipment},
        import_report::ImportReport,
    },
    AppState,
};

use super::{ApiResponse, AuthenticatedUser, PaginatedResponse};

/// List equipment in the caller's department scope
#[utoipa::path(
    get,
    path = "/equipment",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(EquipmentQuery),
    responses(
        (status = 200, description = "Equipment list", body = PaginatedResponse<Equipment>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Department not accessible")
    )
)]
pub async fn list_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<EquipmentQuery>,
) -> AppResult<Json<ApiResponse<PaginatedResponse<Equipment>>>> {
    let (rows, total) = state.services.equipment.list(&claims, &query).await?;
    Ok(ApiResponse::ok(PaginatedResponse::new(
        rows,
        total,
        query.page,
        query.per_page,
    )))
}

#[utoipa::path(
    get,
    path = "/equipment/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Equipment details", body = Equipment),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn get_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Equipment>>> {
    let equipment = state.services.equipment.get_by_id(&claims, id).await?;
    Ok(ApiResponse::ok(equipment))
}

#[utoipa::path(
    post,
    path = "/equipment",
    tag = "equipment",
    security(("bearer_auth" = [])),
    request_body = CreateEquipment,
    responses(
        (status = 201, description = "Equipment created", body = Equipment),
        (status = 403, description = "Department not accessible"),
        (status = 404, description = "Department not found"),
        (status = 422, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateEquipment>,
) -> AppResult<(StatusCode, Json<ApiResponse<Equipment>>)> {
    let equipment = state.services.equipment.create(&claims, data).await?;
    Ok(ApiResponse::created(equipment, "Equipment created"))
}

#[utoipa::path(
    put,
    path = "/equipment/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Equipment ID")),
    request_body = UpdateEquipment,
    responses(
        (status = 200, description = "Equipment updated", body = Equipment),
        (status = 403, description = "Department not accessible"),
        (status = 404, description = "Equipment not found"),
        (status = 422, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateEquipment>,
) -> AppResult<Json<ApiResponse<Equipment>>> {
    let equipment = state.services.equipment.update(&claims, id, data).await?;
    Ok(ApiResponse::with_message(equipment, "Equipment updated"))
}

#[utoipa::path(
    delete,
    path = "/equipment/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Equipment and its maintenance logs deleted"),
        (status = 403, description = "Department not accessible"),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn delete_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.services.equipment.delete(&claims, id).await?;
    Ok(ApiResponse::message("Equipment deleted"))
}

/// Multipart form of the import endpoint (documentation only)
#[derive(Deserialize, ToSchema)]
#[allow(dead_code)]
pub struct ImportUpload {
    /// Target department slug
    pub department_id: String,
    /// CSV file; the first line holds the headers
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

/// Bulk import equipment from a CSV sheet
#[utoipa::path(
    post,
    path = "/equipment/import",
    tag = "equipment",
    security(("bearer_auth" = [])),
    request_body(content = ImportUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Import report; rejected rows are listed with their line number", body = ImportReport),
        (status = 403, description = "Department not accessible"),
        (status = 422, description = "File rejected as a whole", body = crate::error::ErrorResponse)
    )
)]
pub async fn import_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<ImportReport>>> {
    let mut department_id: Option<String> = None;
    let mut file: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        match field.name() {
            Some("department_id") | Some("departmentId") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Invalid department field: {}", e)))?;
                department_id = Some(value);
            }
            Some("file") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Could not read the uploaded file: {}", e)))?;
                file = Some(bytes.to_vec());
            }
            _ => {}
        }
    }

    let mut errors = FieldErrors::new();
    if department_id.as_deref().map_or(true, |d| d.trim().is_empty()) {
        errors.add("departmentId", "Department is required");
    }
    if file.as_ref().map_or(true, |f| f.is_empty()) {
        errors.add("file", "A CSV file is required");
    }
    let (department_id, file) = match (department_id, file) {
        (Some(department_id), Some(file)) if errors.is_empty() => (department_id, file),
        _ => return Err(errors.into()),
    };

    let report = state
        .services
        .import
        .import_equipment(&claims, &department_id, &file)
        .await?;
    let message = format!(
        "Imported {} of {} rows",
        report.created, report.total_rows
    );
    Ok(ApiResponse::with_message(report, message))
}
