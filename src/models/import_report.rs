//! Bulk import report models

use serde::Serialize;
use utoipa::ToSchema;

use crate::error::FieldErrors;

/// Why one spreadsheet row was not imported
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RowError {
    /// Line number in the uploaded file (the header is line 1)
    pub row: u64,
    pub message: String,
    /// Per-field details, when the row parsed but failed validation
    #[serde(skip_serializing_if = "FieldErrors::is_empty")]
    pub fields: FieldErrors,
}

impl RowError {
    pub fn invalid(row: u64, fields: FieldErrors) -> Self {
        Self {
            row,
            message: fields.to_string(),
            fields,
        }
    }

    pub fn failed(row: u64, message: impl Into<String>) -> Self {
        Self {
            row,
            message: message.into(),
            fields: FieldErrors::new(),
        }
    }
}

/// Outcome of an equipment CSV import
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub department_id: String,
    /// Data rows read (blank lines excluded)
    pub total_rows: usize,
    /// Rows that were validated and stored
    pub valid_rows: usize,
    /// Rows rejected, by validation or by the store
    pub invalid_rows: usize,
    /// Rows actually persisted
    pub created: usize,
    pub errors: Vec<RowError>,
}

impl ImportReport {
    /// Build the report; `valid_rows + invalid_rows == total_rows` always holds
    pub fn new(department_id: String, total_rows: usize, created: usize, mut errors: Vec<RowError>) -> Self {
        errors.sort_by_key(|e| e.row);
        let invalid_rows = errors.len();
        Self {
            department_id,
            total_rows,
            valid_rows: total_rows.saturating_sub(invalid_rows),
            invalid_rows,
            created,
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_failures_count_as_invalid() {
        // rows 2 and 3 passed validation, row 3 then failed to insert
        let errors = vec![
            RowError::failed(3, "Could not save this row"),
            RowError::invalid(4, FieldErrors::single("name", "Name is required")),
        ];
        let report = ImportReport::new("agronomy".to_string(), 3, 1, errors);

        assert_eq!(report.valid_rows, 1);
        assert_eq!(report.invalid_rows, 2);
        assert_eq!(report.valid_rows + report.invalid_rows, report.total_rows);
        assert_eq!(report.valid_rows, report.created);
        assert_eq!(report.errors.iter().map(|e| e.row).collect::<Vec<_>>(), vec![3, 4]);
    }
}
