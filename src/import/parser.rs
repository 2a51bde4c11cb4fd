//! Equipment CSV parsing.
//!
//! Rows are validated one at a time; a bad row is reported and skipped,
//! never aborting the rest of the file.

use std::collections::HashMap;

use csv::{ReaderBuilder, StringRecord, Trim};

use super::normalize::{column_for_header, normalize_status, Column};
use crate::{
    error::FieldErrors,
    models::{
        enums::EquipmentStatus,
        equipment::{EquipmentDraft, EquipmentFields},
        import_report::RowError,
    },
};

/// A row that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow {
    pub row: u64,
    pub fields: EquipmentFields,
}

/// Parse outcome before anything is persisted
#[derive(Debug, Clone, Default)]
pub struct ParsedImport {
    pub total_rows: usize,
    pub valid: Vec<ParsedRow>,
    pub errors: Vec<RowError>,
}

/// Parse an uploaded equipment sheet.
///
/// File-level problems (no header, missing name/type column, too many rows)
/// reject the whole upload under the `file` key.
pub fn parse_equipment_csv(data: &[u8], max_rows: usize) -> Result<ParsedImport, FieldErrors> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(data);

    let headers = reader
        .headers()
        .map_err(|e| FieldErrors::single("file", format!("Could not read the header row: {}", e)))?
        .clone();
    let columns = map_columns(&headers)?;

    let mut parsed = ParsedImport::default();
    let mut record = StringRecord::new();
    loop {
        let line = reader.position().line();
        match reader.read_record(&mut record) {
            Ok(false) => break,
            Ok(true) => {
                if record.iter().all(|cell| cell.is_empty()) {
                    continue;
                }
                parsed.total_rows += 1;
                if parsed.total_rows > max_rows {
                    return Err(FieldErrors::single(
                        "file",
                        format!("The file has more than {} rows; split it and try again", max_rows),
                    ));
                }
                let row = record.position().map(|p| p.line()).unwrap_or(line);
                match draft_from_record(&record, &columns).validate_with(parse_import_status) {
                    Ok(fields) => parsed.valid.push(ParsedRow { row, fields }),
                    Err(errors) => parsed.errors.push(RowError::invalid(row, errors)),
                }
            }
            Err(e) => {
                parsed.total_rows += 1;
                let row = e.position().map(|p| p.line()).unwrap_or(line);
                parsed
                    .errors
                    .push(RowError::failed(row, format!("Malformed row: {}", e)));
                if matches!(e.kind(), csv::ErrorKind::Io(_)) {
                    break;
                }
            }
        }
    }

    Ok(parsed)
}

fn map_columns(headers: &StringRecord) -> Result<HashMap<Column, usize>, FieldErrors> {
    let mut columns = HashMap::new();
    for (index, header) in headers.iter().enumerate() {
        if let Some(column) = column_for_header(header) {
            // first matching header wins
            columns.entry(column).or_insert(index);
        }
    }

    let mut errors = FieldErrors::new();
    if !columns.contains_key(&Column::Name) {
        errors.add("file", "Missing a name column (e.g. \"Name\" or \"Equipment Name\")");
    }
    if !columns.contains_key(&Column::Type) {
        errors.add("file", "Missing a type column (e.g. \"Type\" or \"Category\")");
    }
    errors.into_result(columns)
}

fn draft_from_record(record: &StringRecord, columns: &HashMap<Column, usize>) -> EquipmentDraft {
    let cell = |column: Column| {
        columns
            .get(&column)
            .and_then(|&index| record.get(index))
            .map(str::to_string)
    };
    EquipmentDraft {
        name: cell(Column::Name),
        equipment_type: cell(Column::Type),
        status: cell(Column::Status),
        purchase_date: cell(Column::PurchaseDate),
        image_url: cell(Column::ImageUrl),
    }
}

fn parse_import_status(raw: &str) -> Result<EquipmentStatus, String> {
    normalize_status(raw).ok_or_else(|| format!("Unrecognized status '{}'", raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_failures_do_not_abort_batch() {
        let csv = "\
Equipment Name,Category,Condition,Date of Purchase
Tractor X,Machinery,active,2023-01-15
,Machinery,active,2023-01-15
Microscope,Lab,lost,2021-03-03
Seed Drill,Machinery,broken,15/06/2019
Sprayer,Machinery,,
";
        let parsed = parse_equipment_csv(csv.as_bytes(), 100).unwrap();

        assert_eq!(parsed.total_rows, 5);
        assert_eq!(parsed.valid.len(), 3);
        assert_eq!(parsed.errors.len(), 2);

        assert_eq!(parsed.errors[0].row, 3);
        assert!(parsed.errors[0].fields.contains("name"));
        assert_eq!(parsed.errors[1].row, 4);
        assert!(parsed.errors[1].fields.contains("status"));

        let drill = &parsed.valid[1].fields;
        assert_eq!(drill.status, EquipmentStatus::NeedsRepair);
        assert_eq!(drill.purchase_date.map(|d| d.to_string()), Some("2019-06-15".to_string()));
        assert_eq!(parsed.valid[2].fields.status, EquipmentStatus::Available);
    }

    #[test]
    fn test_dates_outside_bounds_fail_the_row() {
        let csv = "name,type,purchaseDate\nOld plough,Machinery,1899-12-31\nDrone,UAV,2999-01-01\nPump,Irrigation,yesterday\n";
        let parsed = parse_equipment_csv(csv.as_bytes(), 100).unwrap();
        assert_eq!(parsed.valid.len(), 0);
        assert_eq!(parsed.errors.len(), 3);
        assert!(parsed.errors.iter().all(|e| e.fields.contains("purchaseDate")));
    }

    #[test]
    fn test_missing_required_columns_rejects_file() {
        let errors = parse_equipment_csv(b"Name,Status\nTractor,active\n", 100).unwrap_err();
        assert!(errors.contains("file"));
    }

    #[test]
    fn test_blank_lines_and_unknown_columns_are_ignored() {
        let csv = "Name,Type,Serial No\nTractor,Machinery,SN-1\n,,\nTiller,Machinery,SN-2\n";
        let parsed = parse_equipment_csv(csv.as_bytes(), 100).unwrap();
        assert_eq!(parsed.total_rows, 2);
        assert_eq!(parsed.valid.len(), 2);
    }

    #[test]
    fn test_row_limit() {
        let csv = "Name,Type\na,b\nc,d\ne,f\n";
        assert!(parse_equipment_csv(csv.as_bytes(), 2).is_err());
        assert!(parse_equipment_csv(csv.as_bytes(), 3).is_ok());
    }

    #[test]
    fn test_short_rows_are_validated_not_rejected_as_malformed() {
        let csv = "Name,Type,Status\nTractor\n";
        let parsed = parse_equipment_csv(csv.as_bytes(), 10).unwrap();
        assert_eq!(parsed.errors.len(), 1);
        assert!(parsed.errors[0].fields.contains("type"));
    }
}
