//! Column format policy: decides the typed value and the display style of a
//! cell from its column's declared kind. Both decisions are pure, so the
//! policy stays independent of the workbook back-end.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use super::{CellStyle, CellValue, RawValue, RenderError};
use crate::report::ColumnKind;

/// Accounting number format: grouped thousands, two decimals, trailing `€`
/// glyph, a literal `-` placeholder for zero and plain right-aligned text
/// for non-numeric values.
pub const ACCOUNTING_FORMAT: &str =
    "_-* #,##0.00\\ \"€\"_-;\\-* #,##0.00\\ \"€\"_-;_-* \"-\"??\\ \"€\"_-;_-@_-";

/// Date display format for date-kind columns.
pub const DATE_FORMAT: &str = "dd.MM.yyyy";

/// Datetime layouts accepted for date-kind values, tried in order after
/// RFC 3339.
const DATETIME_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%d.%m.%Y %H:%M:%S",
];

/// Date-only layouts; the parsed date gets a midnight time component.
const DATE_LAYOUTS: &[&str] = &["%Y-%m-%d", "%d.%m.%Y"];

/// Decide the value to store for a cell of the given column kind.
pub fn decide_value(kind: ColumnKind, raw: &RawValue) -> Result<CellValue, RenderError> {
    match kind {
        ColumnKind::Standard => Ok(passthrough(raw)),
        ColumnKind::Accounting => Ok(accounting_value(raw)),
        ColumnKind::Date => date_value(raw),
    }
}

/// Decide the display style for cells of the given column kind.
pub fn decide_style(kind: ColumnKind) -> CellStyle {
    match kind {
        ColumnKind::Standard => CellStyle::Default,
        ColumnKind::Accounting => CellStyle::Accounting,
        ColumnKind::Date => CellStyle::Date,
    }
}

fn passthrough(raw: &RawValue) -> CellValue {
    match raw {
        RawValue::Null => CellValue::Empty,
        RawValue::Bool(b) => CellValue::Bool(*b),
        RawValue::Int(n) => CellValue::Number(*n as f64),
        RawValue::Float(n) => CellValue::Number(*n),
        RawValue::Text(s) => CellValue::Text(s.clone()),
    }
}

/// Numeric values pass through unchanged; textual values are read under a
/// fixed locale with `,` as decimal separator and `.` as group separator,
/// never the host locale. Text that is not numeric under that locale stays
/// text and is rendered by the accounting format's text section.
fn accounting_value(raw: &RawValue) -> CellValue {
    match raw {
        RawValue::Text(s) => match parse_grouped_number(s) {
            Some(n) => CellValue::Number(n),
            None => CellValue::Text(s.clone()),
        },
        other => passthrough(other),
    }
}

fn parse_grouped_number(text: &str) -> Option<f64> {
    let normalized = text.trim().replace('.', "").replace(',', ".");
    if normalized.is_empty() {
        return None;
    }
    normalized.parse().ok()
}

/// A date cell is parsed from the raw value's string form. An empty string
/// (including `Null`) is a null date, not an error.
fn date_value(raw: &RawValue) -> Result<CellValue, RenderError> {
    let text = raw.to_string();
    if text.is_empty() {
        return Ok(CellValue::Empty);
    }
    parse_date(&text)
        .map(CellValue::Date)
        .ok_or(RenderError::InvalidDate { value: text })
}

fn parse_date(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }
    for layout in DATETIME_LAYOUTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, layout) {
            return Some(dt);
        }
    }
    for layout in DATE_LAYOUTS {
        if let Ok(d) = NaiveDate::parse_from_str(text, layout) {
            return Some(d.and_time(NaiveTime::MIN));
        }
    }
    None
}
