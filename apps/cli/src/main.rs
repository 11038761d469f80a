//! Portfolio report CLI.
//!
//! Reads a Trading212-style CSV export, resolves market and FX data
//! from Yahoo Finance and writes the report tables to an output
//! directory.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use folio_core::constants::DISPLAY_DECIMAL_PRECISION;
use folio_core::report::{export_report, CsvSource, ExportFormat, ReportRequest, ReportService};
use folio_market_data::YahooProvider;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Portfolio analysis for brokerage CSV exports", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the brokerage CSV export
    #[arg(short, long)]
    input: PathBuf,

    /// Directory the report files are written to
    #[arg(short, long, default_value = "./report")]
    output: PathBuf,

    /// Reporting currency, e.g. EUR. Defaults to the currency detected
    /// from the export
    #[arg(short, long)]
    currency: Option<String>,

    /// Window start (YYYY-MM-DD). Defaults to the first trade
    #[arg(long)]
    start: Option<String>,

    /// Window end (YYYY-MM-DD). Defaults to one day past the last trade
    #[arg(long)]
    end: Option<String>,

    /// Output format: csv or json
    #[arg(short, long, default_value = "csv")]
    format: String,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .init();
}

fn parse_date_arg(value: Option<&str>, flag: &str) -> anyhow::Result<Option<NaiveDate>> {
    value
        .map(|text| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .with_context(|| format!("{} expects YYYY-MM-DD, got '{}'", flag, text))
        })
        .transpose()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let format: ExportFormat = cli.format.parse()?;
    let start = parse_date_arg(cli.start.as_deref(), "--start")?;
    let end = parse_date_arg(cli.end.as_deref(), "--end")?;

    let provider = Arc::new(YahooProvider::new()?);
    let service = ReportService::new(provider);

    let mut request = ReportRequest::new(CsvSource::Path(cli.input.clone()));
    request.reporting_currency = cli.currency.clone();
    request.start = start;
    request.end = end;

    let report = service.generate(&request).await?;
    let files = export_report(&report, &cli.output, format)?;

    if !report.dropped_tickers.is_empty() {
        let dropped: Vec<&str> = report
            .dropped_tickers
            .iter()
            .map(|d| d.ticker.as_str())
            .collect();
        tracing::warn!("Could not value: {}", dropped.join(", "));
    }

    let tickers: BTreeSet<&str> = report
        .daily_positions
        .iter()
        .map(|p| p.ticker.as_str())
        .collect();
    match report.snapshots.last() {
        Some(latest) => tracing::info!(
            "{} to {}: {} tickers valued, {} dropped, final value {} {} ({} file(s) in {})",
            report.window.start,
            report.window.end,
            tickers.len(),
            report.dropped_tickers.len(),
            latest.total_value.round_dp(DISPLAY_DECIMAL_PRECISION),
            report.reporting_currency,
            files.len(),
            cli.output.display()
        ),
        None => tracing::warn!(
            "No positions could be valued between {} and {}",
            report.window.start,
            report.window.end
        ),
    }

    Ok(())
}
