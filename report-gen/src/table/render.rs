//! Builds a rendered table from a query result and a page's column kinds.

use std::collections::HashSet;

use super::format::{decide_style, decide_value};
use super::{RenderError, RenderedCell, RenderedTable, TabularResult};
use crate::report::{ColumnKind, ReportPage};

/// Render a query result into the styled table for one report page.
///
/// The header row carries the column names in query order; every data cell
/// is typed and styled according to the page's declared kind for its
/// column, defaulting to `Standard` for unmapped columns. A zero-row
/// result still yields a valid table whose occupied range is the header
/// row alone.
pub fn render(result: &TabularResult, page: &ReportPage) -> Result<RenderedTable, RenderError> {
    if result.columns.is_empty() {
        return Err(RenderError::NoColumns);
    }
    let mut seen = HashSet::new();
    for name in &result.columns {
        if !seen.insert(name.as_str()) {
            return Err(RenderError::DuplicateColumn(name.clone()));
        }
    }

    let kinds: Vec<ColumnKind> = result
        .columns
        .iter()
        .map(|name| page.column_kind(name))
        .collect();

    let mut rows = Vec::with_capacity(result.rows.len());
    for raw_row in &result.rows {
        let mut cells = Vec::with_capacity(result.columns.len());
        for (raw, kind) in raw_row.iter().zip(&kinds) {
            cells.push(RenderedCell {
                value: decide_value(*kind, raw)?,
                style: decide_style(*kind),
            });
        }
        rows.push(cells);
    }

    Ok(RenderedTable {
        sheet_name: page.name.clone(),
        columns: result.columns.clone(),
        rows,
    })
}
