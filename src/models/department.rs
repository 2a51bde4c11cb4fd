//! Department model

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{AppError, FieldErrors};

static SLUG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9-]*$").unwrap());

/// Department (institute, lab or administrative wing)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    /// Stable slug, e.g. "cri"
    pub id: String,
    pub name: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub focal_person: Option<String>,
    pub contact: Option<String>,
    pub logo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Department with ownership counts, for listings
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub department: Department,
    pub equipment_count: i64,
    pub record_count: i64,
    pub user_count: i64,
}

/// What a department still owns; deletion is refused while any is non-zero
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DepartmentUsage {
    pub equipment: i64,
    pub records: i64,
    pub users: i64,
}

impl DepartmentUsage {
    pub fn ensure_deletable(&self, department_id: &str) -> Result<(), AppError> {
        if self.equipment == 0 && self.records == 0 && self.users == 0 {
            return Ok(());
        }
        Err(AppError::Conflict(format!(
            "Department '{}' still owns {} equipment, {} records and {} users; reassign or delete them first",
            department_id, self.equipment, self.records, self.users
        )))
    }
}

/// Create department request (admin only)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDepartment {
    #[validate(length(min = 2, max = 64, message = "Id must be 2 to 64 characters"))]
    pub id: String,
    #[validate(length(min = 2, max = 200, message = "Name must be 2 to 200 characters"))]
    pub name: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub focal_person: Option<String>,
    pub contact: Option<String>,
    pub logo: Option<String>,
}

impl CreateDepartment {
    /// Derive-based checks plus the slug format of `id`
    pub fn check(&self) -> Result<(), FieldErrors> {
        let mut errors = match self.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => e.into(),
        };
        if !errors.contains("id") && !is_valid_slug(&self.id) {
            errors.add("id", "Id may only contain lowercase letters, digits and dashes");
        }
        errors.into_result(())
    }
}

/// Update department request; only supplied fields change
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDepartment {
    #[validate(length(min = 2, max = 200, message = "Name must be 2 to 200 characters"))]
    pub name: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub focal_person: Option<String>,
    pub contact: Option<String>,
    pub logo: Option<String>,
}

/// Built-in reference data for a department, upserted on first use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentSeed {
    pub id: &'static str,
    pub name: &'static str,
    pub location: &'static str,
    pub focal_person: Option<&'static str>,
    pub contact: Option<&'static str>,
}

pub fn is_valid_slug(s: &str) -> bool {
    SLUG_RE.is_match(s)
}
