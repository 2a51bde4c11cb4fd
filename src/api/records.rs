//! Department record endpoints, one set of routes for every schema

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        enums::EquipmentStatus,
        record::{DepartmentRecord, RecordPayload, RecordQuery},
    },
    schemas::{schemas, EntitySchema, FieldKind, FieldSpec, RecordOrdering},
    AppState,
};

use super::{ApiResponse, AuthenticatedUser, PaginatedResponse};

/// Form description of one schema field
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_len: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_len: Option<usize>,
    /// Allowed values for status fields
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

/// Form description of a department schema
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDescriptor {
    pub kind: String,
    pub label: String,
    pub department_id: String,
    pub department_name: String,
    pub title_field: String,
    pub ordering: RecordOrdering,
    pub dashboard_path: String,
    pub fields: Vec<FieldDescriptor>,
}

impl From<&FieldSpec> for FieldDescriptor {
    fn from(field: &FieldSpec) -> Self {
        let options = match field.kind {
            FieldKind::Status => EquipmentStatus::ALL
                .iter()
                .map(|s| s.as_str().to_string())
                .collect(),
            _ => Vec::new(),
        };
        Self {
            name: field.name.to_string(),
            label: field.label.to_string(),
            kind: field.kind,
            required: field.required,
            min_len: field.min_len,
            max_len: field.max_len,
            options,
        }
    }
}

impl From<&EntitySchema> for SchemaDescriptor {
    fn from(schema: &EntitySchema) -> Self {
        Self {
            kind: schema.kind.to_string(),
            label: schema.label.to_string(),
            department_id: schema.department.id.to_string(),
            department_name: schema.department.name.to_string(),
            title_field: schema.title_field.to_string(),
            ordering: schema.ordering,
            dashboard_path: schema.dashboard_path(),
            fields: schema.fields.iter().map(FieldDescriptor::from).collect(),
        }
    }
}

/// Every department schema
#[utoipa::path(
    get,
    path = "/records/schemas",
    tag = "records",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Schema descriptors", body = Vec<SchemaDescriptor>)
    )
)]
pub async fn list_schemas(
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<ApiResponse<Vec<SchemaDescriptor>>>> {
    let descriptors = schemas().iter().map(SchemaDescriptor::from).collect();
    Ok(ApiResponse::ok(descriptors))
}

#[utoipa::path(
    get,
    path = "/records/schemas/{kind}",
    tag = "records",
    security(("bearer_auth" = [])),
    params(("kind" = String, Path, description = "Schema slug, e.g. cri-assets")),
    responses(
        (status = 200, description = "Schema descriptor", body = SchemaDescriptor),
        (status = 404, description = "Unknown record type")
    )
)]
pub async fn get_schema(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(kind): Path<String>,
) -> AppResult<Json<ApiResponse<SchemaDescriptor>>> {
    let schema = state.services.records.schema(&kind)?;
    Ok(ApiResponse::ok(SchemaDescriptor::from(schema)))
}

/// List records of one kind; department heads only see their own department
#[utoipa::path(
    get,
    path = "/records/{kind}",
    tag = "records",
    security(("bearer_auth" = [])),
    params(
        ("kind" = String, Path, description = "Schema slug"),
        RecordQuery
    ),
    responses(
        (status = 200, description = "Records", body = PaginatedResponse<DepartmentRecord>),
        (status = 403, description = "Department not accessible"),
        (status = 404, description = "Unknown record type")
    )
)]
pub async fn list_records(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(kind): Path<String>,
    Query(query): Query<RecordQuery>,
) -> AppResult<Json<ApiResponse<PaginatedResponse<DepartmentRecord>>>> {
    let schema = state.services.records.schema(&kind)?;
    let (rows, total) = state.services.records.list(&claims, schema, &query).await?;
    Ok(ApiResponse::ok(PaginatedResponse::new(
        rows,
        total,
        query.page,
        query.per_page,
    )))
}

#[utoipa::path(
    get,
    path = "/records/{kind}/{id}",
    tag = "records",
    security(("bearer_auth" = [])),
    params(
        ("kind" = String, Path, description = "Schema slug"),
        ("id" = Uuid, Path, description = "Record ID")
    ),
    responses(
        (status = 200, description = "Record", body = DepartmentRecord),
        (status = 404, description = "Record not found")
    )
)]
pub async fn get_record(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path((kind, id)): Path<(String, Uuid)>,
) -> AppResult<Json<ApiResponse<DepartmentRecord>>> {
    let schema = state.services.records.schema(&kind)?;
    let record = state.services.records.get_by_id(&claims, schema, id).await?;
    Ok(ApiResponse::ok(record))
}

#[utoipa::path(
    post,
    path = "/records/{kind}",
    tag = "records",
    security(("bearer_auth" = [])),
    params(("kind" = String, Path, description = "Schema slug")),
    request_body = RecordPayload,
    responses(
        (status = 201, description = "Record created", body = DepartmentRecord),
        (status = 403, description = "Department not accessible"),
        (status = 422, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_record(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(kind): Path<String>,
    Json(payload): Json<RecordPayload>,
) -> AppResult<(StatusCode, Json<ApiResponse<DepartmentRecord>>)> {
    let schema = state.services.records.schema(&kind)?;
    let record = state
        .services
        .records
        .create(&claims, schema, payload.fields())
        .await?;
    Ok(ApiResponse::created(record, format!("{} record created", schema.label)))
}

/// Partial update: only the supplied fields are validated and changed
#[utoipa::path(
    put,
    path = "/records/{kind}/{id}",
    tag = "records",
    security(("bearer_auth" = [])),
    params(
        ("kind" = String, Path, description = "Schema slug"),
        ("id" = Uuid, Path, description = "Record ID")
    ),
    request_body = RecordPayload,
    responses(
        (status = 200, description = "Record updated", body = DepartmentRecord),
        (status = 403, description = "Department not accessible"),
        (status = 404, description = "Record not found"),
        (status = 422, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_record(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path((kind, id)): Path<(String, Uuid)>,
    Json(payload): Json<RecordPayload>,
) -> AppResult<Json<ApiResponse<DepartmentRecord>>> {
    let schema = state.services.records.schema(&kind)?;
    let record = state
        .services
        .records
        .update(&claims, schema, id, payload.fields())
        .await?;
    Ok(ApiResponse::with_message(record, format!("{} record updated", schema.label)))
}

#[utoipa::path(
    delete,
    path = "/records/{kind}/{id}",
    tag = "records",
    security(("bearer_auth" = [])),
    params(
        ("kind" = String, Path, description = "Schema slug"),
        ("id" = Uuid, Path, description = "Record ID")
    ),
    responses(
        (status = 200, description = "Record deleted"),
        (status = 403, description = "Department not accessible"),
        (status = 404, description = "Record not found")
    )
)]
pub async fn delete_record(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path((kind, id)): Path<(String, Uuid)>,
) -> AppResult<Json<ApiResponse<()>>> {
    let schema = state.services.records.schema(&kind)?;
    state.services.records.delete(&claims, schema, id).await?;
    Ok(ApiResponse::message(format!("{} record deleted", schema.label)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::find_schema;

    #[test]
    fn test_descriptor_lists_status_options() {
        let schema = find_schema("cri-assets").unwrap();
        let descriptor = SchemaDescriptor::from(schema);
        assert_eq!(descriptor.department_id, "cri");
        assert_eq!(descriptor.dashboard_path, "/dashboard/cri/cri-assets");

        let status = descriptor
            .fields
            .iter()
            .find(|f| f.kind == FieldKind::Status)
            .unwrap();
        assert_eq!(status.options, vec!["AVAILABLE", "IN_USE", "NEEDS_REPAIR", "DISCARDED"]);
        assert!(descriptor
            .fields
            .iter()
            .filter(|f| f.kind != FieldKind::Status)
            .all(|f| f.options.is_empty()));
    }
}
