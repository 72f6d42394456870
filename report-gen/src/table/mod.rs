//! Tabular data model shared between the data source, the renderer and the
//! workbook sink.

pub mod format;
pub mod render;

use std::fmt;

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::report::ColumnKind;

/// A single value as delivered by the data source, before any formatting
/// decision has been made.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for RawValue {
    /// Plain string form of the value; `Null` renders as the empty string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Null => Ok(()),
            RawValue::Bool(b) => write!(f, "{b}"),
            RawValue::Int(n) => write!(f, "{n}"),
            RawValue::Float(n) => write!(f, "{n}"),
            RawValue::Text(s) => f.write_str(s),
        }
    }
}

/// An ordered query result: column names plus rows of raw values, each row
/// aligned positionally to the columns. Row and column order is preserved
/// all the way into the worksheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabularResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<RawValue>>,
}

/// The typed value stored in a rendered cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
    Date(NaiveDateTime),
}

/// Display style attached to a rendered cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellStyle {
    /// Inherit the sheet default.
    #[default]
    Default,
    /// Accounting number format with a trailing € glyph.
    Accounting,
    /// `dd.MM.yyyy` date format.
    Date,
}

/// One rendered cell: a typed value plus its display style.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedCell {
    pub value: CellValue,
    pub style: CellStyle,
}

/// A fully rendered worksheet table: header row, data rows and the occupied
/// range, ready to be written by the workbook sink.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedTable {
    /// Worksheet title.
    pub sheet_name: String,
    /// Header row, in query order.
    pub columns: Vec<String>,
    /// Data rows; each row has exactly one cell per column.
    pub rows: Vec<Vec<RenderedCell>>,
}

impl RenderedTable {
    /// Zero-based index of the last occupied row, header included. For an
    /// empty result this is the header row itself.
    pub fn last_row(&self) -> u32 {
        self.rows.len() as u32
    }

    /// Zero-based index of the last occupied column.
    pub fn last_column(&self) -> u16 {
        (self.columns.len() - 1) as u16
    }
}

/// Failures produced while turning a query result into a rendered table.
#[derive(Debug, Error, PartialEq)]
pub enum RenderError {
    /// Defensive arm for column kinds this policy does not handle. Cannot
    /// occur with the current closed set; a future `ColumnKind` variant
    /// surfaces here instead of silently rendering as `Standard`.
    #[allow(dead_code)]
    #[error("column kind {0:?} is not supported")]
    UnsupportedColumnKind(ColumnKind),

    #[error("value '{value}' cannot be parsed as a date")]
    InvalidDate { value: String },

    #[error("query result has no columns")]
    NoColumns,

    #[error("duplicate column name '{0}' in query result")]
    DuplicateColumn(String),
}
