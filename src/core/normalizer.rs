//! Cell value normalization
//!
//! Every cell the extractor inspects goes through [`normalize`], both to
//! build record fields and to decide whether a plan cell is empty.

use crate::grid::{Cell, CellValue, FormulaResult};
use chrono::NaiveDateTime;

/// Rendering used for date-formatted numeric cells
pub const DATE_FORMAT: &str = "%a %b %d %H:%M:%S %Y";

/// Canonical display string for an optional cell. A missing cell is `""`.
pub fn normalize(cell: Option<&Cell>) -> String {
    match cell {
        Some(cell) => normalize_value(cell.value()),
        None => String::new(),
    }
}

/// Canonical display string for a cell value
pub fn normalize_value(value: &CellValue) -> String {
    match value {
        CellValue::Text(s) => s.trim().to_string(),
        CellValue::Number(n) => format_number(*n),
        CellValue::Date(dt) => format_date(dt),
        CellValue::Bool(b) => b.to_string(),
        CellValue::Formula(result) => format_formula_result(result),
        CellValue::Blank | CellValue::Error(_) | CellValue::Other => String::new(),
    }
}

/// Missing, blank, or whitespace-only once normalized
pub fn is_empty(cell: Option<&Cell>) -> bool {
    match cell {
        None => true,
        Some(cell) => match cell.value() {
            CellValue::Blank => true,
            value => normalize_value(value).trim().is_empty(),
        },
    }
}

/// Integral values print without decimals, everything else with two
pub fn format_number(n: f64) -> String {
    if n == n.floor() {
        format!("{:.0}", n)
    } else {
        format!("{:.2}", n)
    }
}

pub fn format_date(dt: &NaiveDateTime) -> String {
    dt.format(DATE_FORMAT).to_string()
}

/// Computed results read as numbers first, then as text; anything else is `""`
fn format_formula_result(result: &FormulaResult) -> String {
    match result {
        FormulaResult::Number(n) => format_computed_number(*n),
        FormulaResult::Text(s) => s.clone(),
        FormulaResult::Bool(_) | FormulaResult::Error(_) | FormulaResult::Missing => {
            String::new()
        }
    }
}

/// Shortest round-trip digits with at least one fractional digit. Magnitudes
/// from 1e-3 up to 1e7 print as plain decimals (`1500.0`), others in
/// `d.dddE<exp>` form (`1.2345678E7`, `1.0E-7`).
fn format_computed_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let magnitude = n.abs();
    if magnitude == 0.0 || (1e-3..1e7).contains(&magnitude) {
        return with_fraction(n.to_string());
    }

    let scientific = format!("{:e}", n);
    match scientific.split_once('e') {
        Some((mantissa, exponent)) => {
            format!("{}E{}", with_fraction(mantissa.to_string()), exponent)
        }
        None => scientific,
    }
}

fn with_fraction(mut digits: String) -> String {
    if !digits.contains('.') {
        digits.push_str(".0");
    }
    digits
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn value(v: CellValue) -> String {
        normalize_value(&v)
    }

    #[test]
    fn test_missing_cell_is_empty_string() {
        assert_eq!(normalize(None), "");
        assert!(is_empty(None));
    }

    #[test]
    fn test_blank_matches_missing() {
        let blank = Cell::blank();
        assert_eq!(normalize(Some(&blank)), normalize(None));
        assert_eq!(is_empty(Some(&blank)), is_empty(None));
    }

    #[test]
    fn test_text_is_trimmed() {
        assert_eq!(value(CellValue::Text("  Room & Board \n".into())), "Room & Board");
        assert!(is_empty(Some(&Cell::text("   "))));
        assert!(!is_empty(Some(&Cell::text(" x "))));
    }

    #[test]
    fn test_integral_numbers_have_no_decimals() {
        assert_eq!(value(CellValue::Number(100.0)), "100");
        assert_eq!(value(CellValue::Number(0.0)), "0");
        assert_eq!(value(CellValue::Number(-250.0)), "-250");
        assert_eq!(value(CellValue::Number(1e15)), "1000000000000000");
    }

    #[test]
    fn test_fractional_numbers_have_two_decimals() {
        assert_eq!(value(CellValue::Number(12.5)), "12.50");
        assert_eq!(value(CellValue::Number(0.1)), "0.10");
        assert_eq!(value(CellValue::Number(3.14159)), "3.14");
        assert_eq!(value(CellValue::Number(-0.75)), "-0.75");
    }

    #[test]
    fn test_booleans() {
        assert_eq!(value(CellValue::Bool(true)), "true");
        assert_eq!(value(CellValue::Bool(false)), "false");
    }

    #[test]
    fn test_dates_use_date_format() {
        let dt = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(value(CellValue::Date(dt)), "Mon Jan 15 00:00:00 2024");
    }

    #[test]
    fn test_formula_numeric_result() {
        assert_eq!(value(CellValue::Formula(FormulaResult::Number(1500.0))), "1500.0");
        assert_eq!(value(CellValue::Formula(FormulaResult::Number(0.25))), "0.25");
    }

    #[test]
    fn test_formula_numbers_in_plain_range() {
        assert_eq!(format_computed_number(0.0), "0.0");
        assert_eq!(format_computed_number(0.001), "0.001");
        assert_eq!(format_computed_number(-45.5), "-45.5");
        assert_eq!(format_computed_number(9999999.0), "9999999.0");
    }

    #[test]
    fn test_formula_numbers_outside_plain_range_use_exponent() {
        assert_eq!(format_computed_number(12345678.0), "1.2345678E7");
        assert_eq!(format_computed_number(1e7), "1.0E7");
        assert_eq!(format_computed_number(1e-7), "1.0E-7");
        assert_eq!(format_computed_number(0.00025), "2.5E-4");
        assert_eq!(format_computed_number(-3.5e12), "-3.5E12");
    }

    #[test]
    fn test_formula_numbers_not_finite() {
        assert_eq!(format_computed_number(f64::NAN), "NaN");
        assert_eq!(format_computed_number(f64::INFINITY), "Infinity");
        assert_eq!(format_computed_number(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn test_formula_text_result_falls_back_to_text() {
        assert_eq!(
            value(CellValue::Formula(FormulaResult::Text("Covered".into()))),
            "Covered"
        );
    }

    #[test]
    fn test_formula_unreadable_results_degrade_to_empty() {
        assert_eq!(value(CellValue::Formula(FormulaResult::Bool(true))), "");
        assert_eq!(value(CellValue::Formula(FormulaResult::Error("#DIV/0!".into()))), "");
        assert_eq!(value(CellValue::Formula(FormulaResult::Missing)), "");
        assert!(is_empty(Some(&Cell::new(CellValue::Formula(
            FormulaResult::Missing
        )))));
    }

    #[test]
    fn test_errors_and_unknown_types_are_empty() {
        assert_eq!(value(CellValue::Error("#N/A".into())), "");
        assert_eq!(value(CellValue::Other), "");
        assert!(is_empty(Some(&Cell::new(CellValue::Other))));
    }
}
