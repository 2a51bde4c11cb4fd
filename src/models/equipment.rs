//! Equipment model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::ValidateUrl;

use super::enums::EquipmentStatus;
use crate::error::FieldErrors;
use crate::schemas::coerce::parse_past_date;

/// Equipment record, with the owning department's name joined in
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub equipment_type: String,
    pub status: EquipmentStatus,
    pub purchase_date: Option<NaiveDate>,
    pub image_url: Option<String>,
    pub department_id: String,
    pub department_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Equipment list query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct EquipmentQuery {
    /// Restrict to one department (admins); department heads are always scoped
    pub department_id: Option<String>,
    /// Search by name or type
    pub search: Option<String>,
    pub status: Option<EquipmentStatus>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Validated equipment fields, shared by the API and the CSV import
#[derive(Debug, Clone, PartialEq)]
pub struct EquipmentFields {
    pub name: String,
    pub equipment_type: String,
    pub status: EquipmentStatus,
    pub purchase_date: Option<NaiveDate>,
    pub image_url: Option<String>,
}

/// Unvalidated equipment input as raw strings
#[derive(Debug, Clone, Default)]
pub struct EquipmentDraft {
    pub name: Option<String>,
    pub equipment_type: Option<String>,
    pub status: Option<String>,
    pub purchase_date: Option<String>,
    pub image_url: Option<String>,
}

impl EquipmentDraft {
    /// Check every field, collecting all errors. `parse_status` decides
    /// which spellings of a status are accepted; a blank status means AVAILABLE.
    pub fn validate_with<F>(&self, parse_status: F) -> Result<EquipmentFields, FieldErrors>
    where
        F: Fn(&str) -> Result<EquipmentStatus, String>,
    {
        let mut errors = FieldErrors::new();

        let name = required_text(&mut errors, "name", "Name", self.name.as_deref(), 200);
        let equipment_type =
            required_text(&mut errors, "type", "Type", self.equipment_type.as_deref(), 100);

        let status = match non_blank(self.status.as_deref()) {
            None => EquipmentStatus::default(),
            Some(raw) => parse_status(raw).unwrap_or_else(|message| {
                errors.add("status", message);
                EquipmentStatus::default()
            }),
        };

        let purchase_date = match non_blank(self.purchase_date.as_deref()) {
            None => None,
            Some(raw) => match parse_past_date(raw) {
                Ok(date) => Some(date),
                Err(message) => {
                    errors.add("purchaseDate", message);
                    None
                }
            },
        };

        let image_url = non_blank(self.image_url.as_deref()).map(str::to_string);
        if let Some(ref url) = image_url {
            if !url.starts_with('/') && !url.validate_url() {
                errors.add("imageUrl", "Image URL must be a valid URL or an absolute path");
            }
        }

        errors.into_result(EquipmentFields {
            name,
            equipment_type,
            status,
            purchase_date,
            image_url,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn required_text(
    errors: &mut FieldErrors,
    field: &str,
    label: &str,
    value: Option<&str>,
    max: usize,
) -> String {
    match non_blank(value) {
        None => {
            errors.add(field, format!("{} is required", label));
            String::new()
        }
        Some(text) if text.chars().count() > max => {
            errors.add(field, format!("{} must be at most {} characters", label, max));
            String::new()
        }
        Some(text) => text.to_string(),
    }
}

/// Strict parser for API payloads: canonical status names only
pub fn parse_canonical_status(raw: &str) -> Result<EquipmentStatus, String> {
    raw.parse()
}

/// Create equipment request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEquipment {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub equipment_type: Option<String>,
    /// AVAILABLE (default), IN_USE, NEEDS_REPAIR or DISCARDED
    pub status: Option<String>,
    /// Date of purchase, e.g. 2023-01-15
    pub purchase_date: Option<String>,
    pub image_url: Option<String>,
    pub department_id: Option<String>,
}

impl CreateEquipment {
    pub fn draft(&self) -> EquipmentDraft {
        EquipmentDraft {
            name: self.name.clone(),
            equipment_type: self.equipment_type.clone(),
            status: self.status.clone(),
            purchase_date: self.purchase_date.clone(),
            image_url: self.image_url.clone(),
        }
    }

    /// Target department, needed before anything else can be authorized.
    /// When it is missing every other field error is reported with it.
    pub fn target_department(&self) -> Result<&str, FieldErrors> {
        match non_blank(self.department_id.as_deref()) {
            Some(id) => Ok(id),
            None => Err(self
                .check()
                .err()
                .unwrap_or_else(|| FieldErrors::single("departmentId", "Department is required"))),
        }
    }

    /// Validate fields and the target department together
    pub fn check(&self) -> Result<(EquipmentFields, String), FieldErrors> {
        let mut errors = FieldErrors::new();
        let department_id = non_blank(self.department_id.as_deref()).map(str::to_string);
        if department_id.is_none() {
            errors.add("departmentId", "Department is required");
        }
        match self.draft().validate_with(parse_canonical_status) {
            Ok(fields) if errors.is_empty() => Ok((fields, department_id.unwrap_or_default())),
            Ok(_) => Err(errors),
            Err(field_errors) => {
                errors.merge(field_errors);
                Err(errors)
            }
        }
    }
}

/// Update equipment request; only supplied fields change
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEquipment {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub equipment_type: Option<String>,
    pub status: Option<String>,
    /// Empty string clears the date
    pub purchase_date: Option<String>,
    /// Empty string clears the image
    pub image_url: Option<String>,
    /// Move the equipment to another department
    pub department_id: Option<String>,
}

impl UpdateEquipment {
    /// Validate only the supplied fields by overlaying them on the stored row
    pub fn apply(&self, current: &Equipment) -> Result<EquipmentFields, FieldErrors> {
        let draft = EquipmentDraft {
            name: Some(self.name.clone().unwrap_or_else(|| current.name.clone())),
            equipment_type: Some(
                self.equipment_type
                    .clone()
                    .unwrap_or_else(|| current.equipment_type.clone()),
            ),
            // blank keeps the stored status instead of falling back to AVAILABLE
            status: Some(
                non_blank(self.status.as_deref())
                    .map(str::to_string)
                    .unwrap_or_else(|| current.status.as_str().to_string()),
            ),
            purchase_date: match self.purchase_date {
                Some(ref raw) => Some(raw.clone()),
                None => current.purchase_date.map(|d| d.format("%Y-%m-%d").to_string()),
            },
            image_url: self.image_url.clone().or_else(|| current.image_url.clone()),
        };
        draft.validate_with(parse_canonical_status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(json: serde_json::Value) -> CreateEquipment {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_create_example_tractor() {
        let data = create(serde_json::json!({
            "name": "Tractor X",
            "type": "Machinery",
            "status": "AVAILABLE",
            "purchaseDate": "2023-01-15",
            "departmentId": "agronomy"
        }));
        let (fields, department_id) = data.check().unwrap();
        assert_eq!(department_id, "agronomy");
        assert_eq!(fields.name, "Tractor X");
        assert_eq!(fields.status, EquipmentStatus::Available);
        assert_eq!(fields.purchase_date, NaiveDate::from_ymd_opt(2023, 1, 15));
    }

    #[test]
    fn test_create_collects_every_error() {
        let data = create(serde_json::json!({
            "name": " ",
            "status": "active",
            "purchaseDate": "1850-03-01",
            "imageUrl": "not a url"
        }));
        let errors = data.check().unwrap_err();
        for field in ["name", "type", "status", "purchaseDate", "imageUrl", "departmentId"] {
            assert!(errors.contains(field), "missing error for {}", field);
        }
    }

    #[test]
    fn test_update_validates_only_supplied_fields() {
        let current = Equipment {
            id: Uuid::new_v4(),
            name: "Sprayer".to_string(),
            equipment_type: "Machinery".to_string(),
            status: EquipmentStatus::InUse,
            purchase_date: NaiveDate::from_ymd_opt(2020, 5, 1),
            image_url: None,
            department_id: "entomology".to_string(),
            department_name: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let patch = UpdateEquipment {
            status: Some("NEEDS_REPAIR".to_string()),
            ..Default::default()
        };
        let fields = patch.apply(&current).unwrap();
        assert_eq!(fields.name, "Sprayer");
        assert_eq!(fields.status, EquipmentStatus::NeedsRepair);
        assert_eq!(fields.purchase_date, current.purchase_date);

        let clear = UpdateEquipment {
            purchase_date: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(clear.apply(&current).unwrap().purchase_date, None);

        let blank_name = UpdateEquipment {
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(blank_name.apply(&current).unwrap_err().contains("name"));
    }

    #[test]
    fn test_update_with_blank_status_keeps_current() {
        let current = Equipment {
            id: Uuid::new_v4(),
            name: "Microscope".to_string(),
            equipment_type: "Lab".to_string(),
            status: EquipmentStatus::Discarded,
            purchase_date: None,
            image_url: None,
            department_id: "plant-pathology".to_string(),
            department_name: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let patch = UpdateEquipment {
            status: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(patch.apply(&current).unwrap().status, EquipmentStatus::Discarded);
    }

    #[test]
    fn test_target_department() {
        let data = create(serde_json::json!({ "name": "", "departmentId": " rari " }));
        assert_eq!(data.target_department().unwrap(), "rari");

        let missing = create(serde_json::json!({ "name": "" }));
        let errors = missing.target_department().unwrap_err();
        assert!(errors.contains("departmentId"));
        assert!(errors.contains("name"));
    }
}
