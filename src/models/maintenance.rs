//! Maintenance log model

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::error::FieldErrors;
use crate::schemas::coerce::{coerce_decimal, parse_past_date};

/// Maintenance log entry, with the parent equipment joined in
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceLog {
    pub id: Uuid,
    pub equipment_id: Uuid,
    pub equipment_name: Option<String>,
    pub department_id: Option<String>,
    #[serde(rename = "date")]
    pub log_date: NaiveDate,
    #[schema(value_type = String, example = "1500.00")]
    pub cost: Decimal,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Logs plus their derived total cost
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceLogList {
    pub logs: Vec<MaintenanceLog>,
    #[schema(value_type = String)]
    pub total_cost: Decimal,
}

impl MaintenanceLogList {
    pub fn new(logs: Vec<MaintenanceLog>) -> Self {
        let total_cost = total_cost(&logs);
        Self { logs, total_cost }
    }
}

/// Sum of the logs' costs; never stored
pub fn total_cost(logs: &[MaintenanceLog]) -> Decimal {
    logs.iter().map(|log| log.cost).sum()
}

/// Query for the cross-equipment maintenance listing
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct MaintenanceQuery {
    /// Restrict to one department (admins); department heads are always scoped
    pub department_id: Option<String>,
}

/// Exclusive upper bound of a cost; the column is NUMERIC(12, 2)
pub const COST_LIMIT: i64 = 10_000_000_000;

/// Create maintenance log request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMaintenanceLog {
    /// Date of the maintenance, e.g. 2024-02-01
    pub date: Option<String>,
    /// Cost as a number or numeric string
    #[schema(value_type = Option<String>)]
    pub cost: Option<Value>,
    pub description: Option<String>,
}

/// Validated maintenance log fields
#[derive(Debug, Clone, PartialEq)]
pub struct NewMaintenanceLog {
    pub log_date: NaiveDate,
    pub cost: Decimal,
    pub description: String,
}

impl CreateMaintenanceLog {
    pub fn check(&self) -> Result<NewMaintenanceLog, FieldErrors> {
        let mut errors = FieldErrors::new();

        let log_date = match self.date.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            None => {
                errors.add("date", "Date is required");
                None
            }
            Some(raw) => parse_past_date(raw)
                .map_err(|message| errors.add("date", message))
                .ok(),
        };

        let cost = match self.cost.as_ref() {
            None | Some(Value::Null) => Some(Decimal::ZERO),
            Some(value) => match coerce_decimal(value) {
                Some(cost) if cost.is_sign_negative() => {
                    errors.add("cost", "Cost cannot be negative");
                    None
                }
                Some(cost) if cost >= Decimal::from(COST_LIMIT) => {
                    errors.add("cost", "Cost must be less than 10,000,000,000");
                    None
                }
                Some(cost) if cost.scale() > 2 => {
                    errors.add("cost", "Cost may have at most two decimal places");
                    None
                }
                Some(cost) => Some(cost),
                None => {
                    errors.add("cost", "Cost must be a number");
                    None
                }
            },
        };

        let description = self
            .description
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        if description.is_none() {
            errors.add("description", "Description is required");
        }

        match (log_date, cost, description) {
            (Some(log_date), Some(cost), Some(description)) if errors.is_empty() => {
                Ok(NewMaintenanceLog {
                    log_date,
                    cost,
                    description,
                })
            }
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    fn log(cost: &str) -> MaintenanceLog {
        MaintenanceLog {
            id: Uuid::new_v4(),
            equipment_id: Uuid::new_v4(),
            equipment_name: None,
            department_id: None,
            log_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            cost: Decimal::from_str(cost).unwrap(),
            description: "Oil change".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_total_cost_is_exact_sum() {
        let logs = vec![log("0.10"), log("0.20"), log("1500.00")];
        assert_eq!(total_cost(&logs), Decimal::from_str("1500.30").unwrap());
        assert_eq!(MaintenanceLogList::new(logs).total_cost, Decimal::from_str("1500.30").unwrap());
        assert_eq!(total_cost(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_create_check() {
        let ok: CreateMaintenanceLog = serde_json::from_value(json!({
            "date": "2024-02-01",
            "cost": "2,500.50",
            "description": "Replaced hydraulic hose"
        }))
        .unwrap();
        let checked = ok.check().unwrap();
        assert_eq!(checked.cost, Decimal::from_str("2500.50").unwrap());

        let bad: CreateMaintenanceLog = serde_json::from_value(json!({
            "date": "2999-01-01",
            "cost": -5,
            "description": " "
        }))
        .unwrap();
        let errors = bad.check().unwrap_err();
        assert!(errors.contains("date"));
        assert!(errors.contains("cost"));
        assert!(errors.contains("description"));
    }

    #[test]
    fn test_missing_cost_defaults_to_zero() {
        let data: CreateMaintenanceLog = serde_json::from_value(json!({
            "date": "2024-02-01",
            "description": "Inspection"
        }))
        .unwrap();
        assert_eq!(data.check().unwrap().cost, Decimal::ZERO);
    }

    #[test]
    fn test_cost_must_fit_column_precision() {
        let cost = |value: serde_json::Value| -> CreateMaintenanceLog {
            serde_json::from_value(json!({
                "date": "2024-02-01",
                "cost": value,
                "description": "Engine overhaul"
            }))
            .unwrap()
        };

        assert!(cost(json!("12345678901.00")).check().unwrap_err().contains("cost"));
        assert!(cost(json!(10_000_000_000i64)).check().unwrap_err().contains("cost"));
        assert_eq!(
            cost(json!("9999999999.99")).check().unwrap().cost,
            Decimal::from_str("9999999999.99").unwrap()
        );
    }
}
