//! Department entity schemas.
//!
//! Every department-specific table (positions, assets, facilities, projects,
//! stock items) is described here as data. A single generic record store
//! serves all of them; the schema supplies the field rules, the owning
//! department and the list ordering.

pub mod coerce;
pub mod registry;
pub mod validate;

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::department::DepartmentSeed;

pub use registry::{find_schema, schemas, DEPARTMENTS};
pub use validate::{validate_create, validate_update, ValidatedRecord};

/// Primitive type of a schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Integer,
    Decimal,
    /// Stored as `YYYY-MM-DD`
    Date,
    Boolean,
    Email,
    /// One of the equipment statuses; stored in the `status` column
    Status,
}

/// One field of a department schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_len: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_len: Option<usize>,
}

impl FieldSpec {
    pub const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
            min_len: None,
            max_len: None,
        }
    }

    pub const fn text(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Text).max(500)
    }

    pub const fn integer(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Integer)
    }

    pub const fn decimal(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Decimal)
    }

    pub const fn date(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Date)
    }

    pub const fn boolean(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Boolean)
    }

    pub const fn email(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Email)
    }

    pub const fn status() -> Self {
        Self::new(STATUS_FIELD, "Status", FieldKind::Status)
    }

    /// Required; text fields additionally need at least one character
    pub const fn required(mut self) -> Self {
        self.required = true;
        if matches!(self.kind, FieldKind::Text) && self.min_len.is_none() {
            self.min_len = Some(1);
        }
        self
    }

    pub const fn min(mut self, len: usize) -> Self {
        self.min_len = Some(len);
        self
    }

    pub const fn max(mut self, len: usize) -> Self {
        self.max_len = Some(len);
        self
    }
}

/// How a schema's list is ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RecordOrdering {
    /// `displayOrder` ascending (unset last), then newest first
    DisplayOrder,
    /// Newest first
    Recent,
}

/// Field that carries the explicit display order for `RecordOrdering::DisplayOrder`
pub const DISPLAY_ORDER_FIELD: &str = "displayOrder";
/// Field that carries the status for status-bearing schemas
pub const STATUS_FIELD: &str = "status";

/// A department entity type
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySchema {
    /// Slug, stored in the `kind` column
    pub kind: &'static str,
    pub label: &'static str,
    pub department: &'static DepartmentSeed,
    /// Field whose value becomes the record's `name`
    pub title_field: &'static str,
    pub ordering: RecordOrdering,
    pub fields: &'static [FieldSpec],
}

impl EntitySchema {
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_status(&self) -> bool {
        self.fields.iter().any(|f| f.kind == FieldKind::Status)
    }

    /// Dashboard path marked stale after a mutation of this schema's records
    pub fn dashboard_path(&self) -> String {
        format!("/dashboard/{}/{}", self.department.id, self.kind)
    }
}
