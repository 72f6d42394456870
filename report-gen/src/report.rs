//! Report definitions: which queries to run, how to format their columns
//! and where the workbook goes.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Formatting category declared for a named column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// Value passes through with the sheet default style.
    Standard,
    /// Numeric value with the accounting currency format.
    Accounting,
    /// Calendar date with the `dd.MM.yyyy` format.
    Date,
}

/// One worksheet: a title, the query backing it and per-column kinds.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportPage {
    pub name: String,
    pub query: String,
    /// Column-name to kind mapping, matched case-sensitively. Columns not
    /// listed here render as `Standard`.
    #[serde(default)]
    pub columns: HashMap<String, ColumnKind>,
}

impl ReportPage {
    pub fn column_kind(&self, column: &str) -> ColumnKind {
        self.columns
            .get(column)
            .copied()
            .unwrap_or(ColumnKind::Standard)
    }
}

/// One workbook: destination path plus its pages in order.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportDefinition {
    pub output: PathBuf,
    #[serde(rename = "page")]
    pub pages: Vec<ReportPage>,
}

#[derive(Debug, Deserialize)]
struct ReportFile {
    #[serde(rename = "report", default)]
    reports: Vec<ReportDefinition>,
}

/// Load report definitions from a TOML file.
pub fn load_definitions(path: &Path) -> Result<Vec<ReportDefinition>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read report definitions from {}", path.display()))?;
    let file: ReportFile = toml::from_str(&text)
        .with_context(|| format!("Failed to parse report definitions in {}", path.display()))?;
    Ok(file.reports)
}
