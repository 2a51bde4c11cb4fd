//! Spreadsheet (CSV) import of equipment

pub mod normalize;
pub mod parser;

pub use parser::{parse_equipment_csv, ParsedImport, ParsedRow};
