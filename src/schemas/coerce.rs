//! Type coercions for loosely-typed form and CSV input

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

/// Accepted date layouts, tried in order. Day-first comes before
/// month-first, so `03/04/2023` reads as 3 April.
const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y", "%m/%d/%Y"];

pub fn earliest_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Parse a date in any accepted layout (or RFC 3339), without bounds
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date);
        }
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

/// Parse a date and require it to lie in `[1900-01-01, today]`
pub fn parse_date_bounded(raw: &str, today: NaiveDate) -> Result<NaiveDate, String> {
    let date = parse_date(raw).ok_or_else(|| format!("'{}' is not a valid date", raw.trim()))?;
    if date < earliest_date() {
        return Err("Date must not be before 1900-01-01".to_string());
    }
    if date > today {
        return Err("Date cannot be in the future".to_string());
    }
    Ok(date)
}

/// [`parse_date_bounded`] against the current UTC date
pub fn parse_past_date(raw: &str) -> Result<NaiveDate, String> {
    parse_date_bounded(raw, Utc::now().date_naive())
}

/// Integer from a JSON number or a numeric string
pub fn coerce_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().replace(',', "").parse::<i64>().ok(),
        _ => None,
    }
}

/// Decimal from a JSON number or a numeric string (thousands separators allowed)
pub fn coerce_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        Value::String(s) => Decimal::from_str(s.trim().replace(',', "").as_str()).ok(),
        _ => None,
    }
}

/// Boolean from a JSON bool or the usual form spellings
pub fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|i| i != 0),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "y" | "1" | "on" => Some(true),
            "false" | "no" | "n" | "0" | "off" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Null, missing-equivalent and whitespace-only strings count as "not supplied"
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_parse_date_layouts() {
        assert_eq!(parse_date("2023-01-15"), Some(d(2023, 1, 15)));
        assert_eq!(parse_date("2023/01/15"), Some(d(2023, 1, 15)));
        assert_eq!(parse_date("15/01/2023"), Some(d(2023, 1, 15)));
        assert_eq!(parse_date("15-01-2023"), Some(d(2023, 1, 15)));
        // month-first only when day-first is impossible
        assert_eq!(parse_date("01/15/2023"), Some(d(2023, 1, 15)));
        assert_eq!(parse_date("03/04/2023"), Some(d(2023, 4, 3)));
        assert_eq!(parse_date("2023-01-15T10:00:00Z"), Some(d(2023, 1, 15)));
        assert_eq!(parse_date("last tuesday"), None);
        assert_eq!(parse_date("   "), None);
    }

    #[test]
    fn test_date_bounds() {
        let today = d(2024, 6, 1);
        assert!(parse_date_bounded("1900-01-01", today).is_ok());
        assert!(parse_date_bounded("1899-12-31", today).is_err());
        assert!(parse_date_bounded("2024-06-01", today).is_ok());
        assert!(parse_date_bounded("2024-06-02", today).is_err());
        assert!(parse_date_bounded("not a date", today).is_err());
    }

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(coerce_integer(&json!(12)), Some(12));
        assert_eq!(coerce_integer(&json!("  17 ")), Some(17));
        assert_eq!(coerce_integer(&json!("1,200")), Some(1200));
        assert_eq!(coerce_integer(&json!(3.0)), Some(3));
        assert_eq!(coerce_integer(&json!(3.5)), None);
        assert_eq!(coerce_integer(&json!("twelve")), None);

        assert_eq!(coerce_decimal(&json!("1,250.50")), Decimal::from_str("1250.50").ok());
        assert_eq!(coerce_decimal(&json!(99.5)), Decimal::from_str("99.5").ok());
        assert_eq!(coerce_decimal(&json!(true)), None);
    }

    #[test]
    fn test_bool_and_blank() {
        assert_eq!(coerce_bool(&json!("Yes")), Some(true));
        assert_eq!(coerce_bool(&json!(0)), Some(false));
        assert_eq!(coerce_bool(&json!("maybe")), None);
        assert!(is_blank(&json!(null)));
        assert!(is_blank(&json!("  ")));
        assert!(!is_blank(&json!(0)));
    }
}
