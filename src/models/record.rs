//! Department record model: one row of any department-specific table

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::enums::EquipmentStatus;

/// Stored department record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentRecord {
    pub id: Uuid,
    /// Schema slug, e.g. "cri-assets"
    pub kind: String,
    pub department_id: String,
    pub department_name: Option<String>,
    /// Value of the schema's title field
    pub name: String,
    pub status: Option<EquipmentStatus>,
    pub display_order: Option<i32>,
    /// Department-specific fields, already coerced
    #[schema(value_type = Object)]
    pub attributes: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DepartmentRecord {
    pub fn attribute_map(&self) -> Map<String, Value> {
        self.attributes.as_object().cloned().unwrap_or_default()
    }
}

/// Record list query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct RecordQuery {
    /// Case-insensitive search on the record name
    pub search: Option<String>,
    pub status: Option<EquipmentStatus>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Create/update payload: field name to value, as declared by the schema
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct RecordPayload(pub Map<String, Value>);

impl RecordPayload {
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}
