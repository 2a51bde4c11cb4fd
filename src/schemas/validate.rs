//! Payload validation against a department schema.
//!
//! Creates validate the whole schema. Updates are partial: only supplied
//! fields are checked, but a supplied required field must still be valid.

use serde_json::{Map, Value};
use validator::ValidateEmail;

use super::coerce::{coerce_bool, coerce_decimal, coerce_integer, earliest_date, is_blank, parse_date};
use super::{EntitySchema, FieldKind, FieldSpec, DISPLAY_ORDER_FIELD, STATUS_FIELD};
use crate::error::FieldErrors;
use crate::models::enums::EquipmentStatus;

/// Keys a client may echo back from a fetched record; ignored on input
const RESERVED_KEYS: [&str; 7] = [
    "id",
    "kind",
    "name",
    "departmentId",
    "department",
    "createdAt",
    "updatedAt",
];

/// A record ready to be stored: the coerced attributes plus the columns
/// projected from them
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRecord {
    pub name: String,
    pub status: Option<EquipmentStatus>,
    pub display_order: Option<i32>,
    pub attributes: Map<String, Value>,
}

impl ValidatedRecord {
    /// Project the indexed columns out of a complete attribute map
    pub fn from_attributes(schema: &EntitySchema, attributes: Map<String, Value>) -> Self {
        let name = attributes
            .get(schema.title_field)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let status = if schema.has_status() {
            attributes
                .get(STATUS_FIELD)
                .and_then(Value::as_str)
                .and_then(|s| s.parse().ok())
        } else {
            None
        };
        let display_order = attributes
            .get(DISPLAY_ORDER_FIELD)
            .and_then(Value::as_i64)
            .and_then(|v| i32::try_from(v).ok());

        Self {
            name,
            status,
            display_order,
            attributes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Create,
    Update,
}

/// Validate a full create payload
pub fn validate_create(
    schema: &EntitySchema,
    payload: &Map<String, Value>,
) -> Result<ValidatedRecord, FieldErrors> {
    let mut attributes = validate_fields(schema, payload, Mode::Create)?;
    if schema.has_status() && !attributes.contains_key(STATUS_FIELD) {
        attributes.insert(
            STATUS_FIELD.to_string(),
            Value::String(EquipmentStatus::default().as_str().to_string()),
        );
    }
    Ok(ValidatedRecord::from_attributes(schema, attributes))
}

/// Validate a partial update payload and merge it over the stored attributes.
///
/// Blank optional fields are removed from the merged result.
pub fn validate_update(
    schema: &EntitySchema,
    existing: &Map<String, Value>,
    payload: &Map<String, Value>,
) -> Result<ValidatedRecord, FieldErrors> {
    let patch = validate_fields(schema, payload, Mode::Update)?;

    let mut merged = existing.clone();
    for (key, value) in patch {
        if value.is_null() {
            merged.remove(&key);
        } else {
            merged.insert(key, value);
        }
    }
    Ok(ValidatedRecord::from_attributes(schema, merged))
}

fn validate_fields(
    schema: &EntitySchema,
    payload: &Map<String, Value>,
    mode: Mode,
) -> Result<Map<String, Value>, FieldErrors> {
    let mut errors = FieldErrors::new();
    let mut out = Map::new();

    for key in payload.keys() {
        if schema.field(key).is_none() && !RESERVED_KEYS.contains(&key.as_str()) {
            errors.add(key.clone(), "Unknown field");
        }
    }

    for field in schema.fields {
        let value = payload.get(field.name);
        match value {
            None if mode == Mode::Update => {}
            Some(v) if is_blank(v) => {
                if field.required {
                    errors.add(field.name, format!("{} is required", field.label));
                } else if mode == Mode::Update {
                    out.insert(field.name.to_string(), Value::Null);
                }
            }
            None => {
                if field.required {
                    errors.add(field.name, format!("{} is required", field.label));
                }
            }
            Some(v) => match coerce_field(field, v) {
                Ok(coerced) => {
                    out.insert(field.name.to_string(), coerced);
                }
                Err(message) => errors.add(field.name, message),
            },
        }
    }

    errors.into_result(out)
}

fn coerce_field(field: &FieldSpec, value: &Value) -> Result<Value, String> {
    match field.kind {
        FieldKind::Text => {
            let text = match value {
                Value::String(s) => s.trim().to_string(),
                Value::Number(n) => n.to_string(),
                _ => return Err(format!("{} must be text", field.label)),
            };
            check_length(field, &text)?;
            Ok(Value::String(text))
        }
        FieldKind::Email => {
            let text = value
                .as_str()
                .map(str::trim)
                .ok_or_else(|| format!("{} must be text", field.label))?;
            if !text.validate_email() {
                return Err(format!("{} must be a valid email address", field.label));
            }
            check_length(field, text)?;
            Ok(Value::String(text.to_string()))
        }
        FieldKind::Integer => coerce_integer(value)
            .map(Value::from)
            .ok_or_else(|| format!("{} must be a whole number", field.label)),
        FieldKind::Decimal => coerce_decimal(value)
            .map(|d| Value::String(d.normalize().to_string()))
            .ok_or_else(|| format!("{} must be a number", field.label)),
        FieldKind::Date => {
            let date = value
                .as_str()
                .and_then(parse_date)
                .ok_or_else(|| format!("{} must be a valid date", field.label))?;
            if date < earliest_date() {
                return Err(format!("{} must not be before 1900-01-01", field.label));
            }
            Ok(Value::String(date.format("%Y-%m-%d").to_string()))
        }
        FieldKind::Boolean => coerce_bool(value)
            .map(Value::Bool)
            .ok_or_else(|| format!("{} must be yes or no", field.label)),
        FieldKind::Status => value
            .as_str()
            .ok_or_else(|| format!("{} must be text", field.label))?
            .parse::<EquipmentStatus>()
            .map(|s| Value::String(s.as_str().to_string())),
    }
}

fn check_length(field: &FieldSpec, text: &str) -> Result<(), String> {
    let len = text.chars().count();
    if let Some(min) = field.min_len {
        if len < min {
            return Err(if min == 1 {
                format!("{} is required", field.label)
            } else {
                format!("{} must be at least {} characters", field.label, min)
            });
        }
    }
    if let Some(max) = field.max_len {
        if len > max {
            return Err(format!("{} must be at most {} characters", field.label, max));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::find_schema;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_create_missing_required_field_is_named() {
        let schema = find_schema("cri-positions").unwrap();
        let errors = validate_create(
            schema,
            &object(json!({ "designation": "Assistant Botanist", "sanctionedPosts": 2 })),
        )
        .unwrap_err();

        assert!(errors.contains("bpsScale"));
        assert!(!errors.contains("designation"));
        assert_eq!(errors.get("bpsScale").unwrap()[0], "BPS Scale is required");
    }

    #[test]
    fn test_create_coerces_strings() {
        let schema = find_schema("cri-assets").unwrap();
        let record = validate_create(
            schema,
            &object(json!({
                "assetName": "  Ginning Machine ",
                "category": "Machinery",
                "quantity": "3",
                "cost": "1,250,000.50",
                "purchaseDate": "15/01/2023",
                "status": "in use"
            })),
        )
        .unwrap();

        assert_eq!(record.name, "Ginning Machine");
        assert_eq!(record.status, Some(EquipmentStatus::InUse));
        assert_eq!(record.attributes["quantity"], json!(3));
        assert_eq!(record.attributes["cost"], json!("1250000.5"));
        assert_eq!(record.attributes["purchaseDate"], json!("2023-01-15"));
    }

    #[test]
    fn test_record_dates_allow_future_but_not_before_1900() {
        let schema = find_schema("rari-projects").unwrap();
        let record = validate_create(
            schema,
            &object(json!({
                "projectTitle": "Heat tolerant wheat",
                "principalInvestigator": "Dr. Ayesha",
                "startDate": "2024-07-01",
                "endDate": "2099-06-30"
            })),
        )
        .unwrap();
        assert_eq!(record.attributes["endDate"], json!("2099-06-30"));

        let errors = validate_create(
            schema,
            &object(json!({
                "projectTitle": "Old survey",
                "principalInvestigator": "Dr. Ayesha",
                "startDate": "1850-01-01"
            })),
        )
        .unwrap_err();
        assert!(errors.contains("startDate"));
    }

    #[test]
    fn test_create_defaults_status_and_skips_blank_optionals() {
        let schema = find_schema("rari-assets").unwrap();
        let record = validate_create(
            schema,
            &object(json!({ "assetName": "Tube well", "category": "Irrigation", "remarks": "" })),
        )
        .unwrap();

        assert_eq!(record.status, Some(EquipmentStatus::Available));
        assert!(!record.attributes.contains_key("remarks"));
    }

    #[test]
    fn test_create_rejects_unknown_and_bad_types() {
        let schema = find_schema("rari-assets").unwrap();
        let errors = validate_create(
            schema,
            &object(json!({
                "assetName": "Tractor",
                "category": "Machinery",
                "quantity": "a few",
                "colour": "red",
                "status": "lost"
            })),
        )
        .unwrap_err();

        assert!(errors.contains("quantity"));
        assert!(errors.contains("colour"));
        assert!(errors.contains("status"));
    }

    #[test]
    fn test_reserved_keys_are_ignored() {
        let schema = find_schema("rari-assets").unwrap();
        let record = validate_create(
            schema,
            &object(json!({
                "id": "4b0c",
                "departmentId": "rari",
                "assetName": "Seed drill",
                "category": "Machinery"
            })),
        )
        .unwrap();
        assert!(!record.attributes.contains_key("departmentId"));
    }

    #[test]
    fn test_update_blank_required_field_fails() {
        let schema = find_schema("adaptive-research-positions").unwrap();
        let existing = object(json!({
            "designation": "Agronomist",
            "bpsScale": "17",
            "sanctionedPosts": 1
        }));
        let errors = validate_update(schema, &existing, &object(json!({ "bpsScale": "" }))).unwrap_err();
        assert!(errors.contains("bpsScale"));
        assert!(!errors.contains("designation"));
    }

    #[test]
    fn test_update_is_partial_and_merges() {
        let schema = find_schema("adaptive-research-positions").unwrap();
        let existing = object(json!({
            "designation": "Agronomist",
            "bpsScale": "17",
            "sanctionedPosts": 1,
            "remarks": "vacant since 2021",
            "displayOrder": 4
        }));
        let record = validate_update(
            schema,
            &existing,
            &object(json!({ "filledPosts": "1", "remarks": "", "displayOrder": 2 })),
        )
        .unwrap();

        assert_eq!(record.name, "Agronomist");
        assert_eq!(record.display_order, Some(2));
        assert_eq!(record.attributes["filledPosts"], json!(1));
        assert_eq!(record.attributes["bpsScale"], json!("17"));
        assert!(!record.attributes.contains_key("remarks"));
    }

    #[test]
    fn test_email_and_boolean_fields() {
        let schema = find_schema("entomology-facilities").unwrap();
        let errors = validate_create(
            schema,
            &object(json!({
                "facilityName": "Insectary",
                "facilityType": "Rearing room",
                "contactEmail": "not-an-email"
            })),
        )
        .unwrap_err();
        assert!(errors.contains("contactEmail"));

        let schema = find_schema("agronomy-facilities").unwrap();
        let record = validate_create(
            schema,
            &object(json!({ "facilityName": "Block C", "facilityType": "Field", "irrigated": "yes" })),
        )
        .unwrap();
        assert_eq!(record.attributes["irrigated"], json!(true));
    }
}
