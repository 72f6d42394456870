//! Command-line entry point: resolve connection settings, load the report
//! definitions and run the generation loop.

mod config;
mod generator;
mod report;
mod sink;
mod source;
mod table;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use crate::config::ConnectionSettings;
use crate::generator::ReportGenerator;
use crate::source::SqliteSource;

/// Export SQL query results as styled Excel report workbooks.
#[derive(Parser)]
#[command(name = "report-gen", version, about)]
struct Cli {
    /// Path to the TOML report definitions.
    reports: PathBuf,

    /// Connection config file; defaults to the user config directory.
    /// DATABASE_URL overrides both.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let reports = report::load_definitions(&cli.reports)?;
    if reports.is_empty() {
        log::warn!("No report definitions found in {}", cli.reports.display());
        return Ok(ExitCode::SUCCESS);
    }

    let settings = ConnectionSettings::resolve(cli.config.as_deref())?;
    let source = SqliteSource::connect(&settings).await?;
    let generator = ReportGenerator::new(source);

    let summary = generator.generate(&reports).await;
    log::info!(
        "Generated {} report(s), {} failed",
        summary.generated,
        summary.failed
    );

    if summary.failed > 0 {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
