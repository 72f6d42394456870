//! Report generation loop: fetch each page's data, render it and persist
//! one workbook per report definition.

use anyhow::{Context, Result};

use crate::report::ReportDefinition;
use crate::sink;
use crate::source::DataSource;
use crate::table::render::render;

/// Outcome of a generation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationSummary {
    pub generated: usize,
    pub failed: usize,
}

/// Drives report generation against a data source.
pub struct ReportGenerator<S> {
    source: S,
}

impl<S: DataSource> ReportGenerator<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Generate every report in sequence. A failing report is logged and
    /// skipped; the remaining definitions are still attempted.
    pub async fn generate(&self, reports: &[ReportDefinition]) -> GenerationSummary {
        let mut summary = GenerationSummary::default();
        for report in reports {
            log::info!("Starting generation of '{}'", report.output.display());
            match self.generate_one(report).await {
                Ok(()) => {
                    summary.generated += 1;
                    log::info!("Saved '{}'", report.output.display());
                }
                Err(err) => {
                    summary.failed += 1;
                    log::error!("Report '{}' failed: {err:#}", report.output.display());
                }
            }
        }
        summary
    }

    async fn generate_one(&self, report: &ReportDefinition) -> Result<()> {
        let mut sheets = Vec::with_capacity(report.pages.len());
        for page in &report.pages {
            log::info!("Adding page '{}'", page.name);
            log::debug!("Fetching data for page '{}'", page.name);
            let data = self
                .source
                .fetch(&page.query)
                .await
                .with_context(|| format!("Failed to fetch data for page '{}'", page.name))?;
            log::debug!(
                "Rendering worksheet for page '{}' ({} rows)",
                page.name,
                data.rows.len()
            );
            let sheet = render(&data, page)
                .with_context(|| format!("Failed to render page '{}'", page.name))?;
            sheets.push(sheet);
        }
        log::debug!("Saving workbook to '{}'", report.output.display());
        sink::write_workbook(&report.output, &sheets)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::Path;

    use anyhow::anyhow;
    use async_trait::async_trait;

    use super::*;
    use crate::report::{ColumnKind, ReportPage};
    use crate::table::{RawValue, TabularResult};

    /// Canned data source keyed by query text.
    struct FakeSource {
        tables: HashMap<String, TabularResult>,
    }

    #[async_trait]
    impl DataSource for FakeSource {
        async fn fetch(&self, query: &str) -> Result<TabularResult> {
            self.tables
                .get(query)
                .cloned()
                .ok_or_else(|| anyhow!("no data for query '{query}'"))
        }
    }

    fn make_source() -> FakeSource {
        let mut tables = HashMap::new();
        tables.insert(
            "SELECT * FROM invoices".to_string(),
            TabularResult {
                columns: vec!["Seller".to_string(), "Price".to_string()],
                rows: vec![vec![
                    RawValue::Text("Acme".to_string()),
                    RawValue::Float(19.5),
                ]],
            },
        );
        FakeSource { tables }
    }

    fn make_report(output: &Path, query: &str) -> ReportDefinition {
        ReportDefinition {
            output: output.to_path_buf(),
            pages: vec![ReportPage {
                name: "Invoices".to_string(),
                query: query.to_string(),
                columns: HashMap::from([("Price".to_string(), ColumnKind::Accounting)]),
            }],
        }
    }

    #[tokio::test]
    async fn test_generate_writes_one_workbook_per_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invoices.xlsx");
        let generator = ReportGenerator::new(make_source());

        let summary = generator
            .generate(&[make_report(&path, "SELECT * FROM invoices")])
            .await;

        assert_eq!(
            summary,
            GenerationSummary {
                generated: 1,
                failed: 0
            }
        );
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_generate_continues_after_a_failed_report() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.xlsx");
        let good = dir.path().join("good.xlsx");
        let generator = ReportGenerator::new(make_source());

        let summary = generator
            .generate(&[
                make_report(&bad, "SELECT * FROM nowhere"),
                make_report(&good, "SELECT * FROM invoices"),
            ])
            .await;

        assert_eq!(
            summary,
            GenerationSummary {
                generated: 1,
                failed: 1
            }
        );
        assert!(!bad.exists());
        assert!(good.exists());
    }

    #[tokio::test]
    async fn test_render_failures_abort_only_that_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dates.xlsx");

        let mut tables = HashMap::new();
        tables.insert(
            "SELECT * FROM invoices".to_string(),
            TabularResult {
                columns: vec!["Date".to_string()],
                rows: vec![vec![RawValue::Text("not-a-date".to_string())]],
            },
        );
        let generator = ReportGenerator::new(FakeSource { tables });

        let mut report = make_report(&path, "SELECT * FROM invoices");
        report.pages[0].columns = HashMap::from([("Date".to_string(), ColumnKind::Date)]);

        let summary = generator.generate(&[report]).await;
        assert_eq!(summary.failed, 1);
        assert!(!path.exists());
    }
}
