//! Batch pipeline from brokerage export to report tables.
//!
//! One run is a pure transform: import trades, build per-ticker ledgers,
//! resolve market and FX series, align everything onto daily axes and
//! derive portfolio totals and statistics. Nothing is persisted between
//! runs.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use log::{debug, info};
use rayon::prelude::*;

use super::report_model::{CsvSource, PortfolioReport, ReportRequest, ReportWindow};
use crate::errors::{Error, Result, ValidationError};
use crate::fx::{FxError, FxRateRegistry};
use crate::market_data::MarketDataService;
use crate::portfolio::{
    aggregate_daily_positions, align_series, build_ledger, compute_statistics, DailyPosition,
    TickerLedger,
};
use crate::transactions::{import_bytes, import_file, ImportedTransactions, Transaction};
use folio_market_data::{MarketDataProvider, PriceSeries};

/// Orchestrates one report run end to end.
pub struct ReportService {
    market_data: MarketDataService,
}

impl ReportService {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self {
            market_data: MarketDataService::new(provider),
        }
    }

    /// Builds the full portfolio report for a request.
    ///
    /// Tickers whose market data cannot be resolved are dropped from the
    /// valuation tables but still counted in the trading activity
    /// statistics. An export without a single trade, a malformed window
    /// and an unresolvable FX pair are fatal.
    pub async fn generate(&self, request: &ReportRequest) -> Result<PortfolioReport> {
        let imported = load_transactions(&request.csv_source)?;
        if imported.skipped_rows > 0 {
            debug!("Skipped {} non-trading rows", imported.skipped_rows);
        }

        let reporting_currency = request
            .reporting_currency
            .clone()
            .unwrap_or_else(|| imported.reporting_currency.clone());

        let window = resolve_window(request, &imported.transactions)?;
        debug!(
            "Report window {} to {} in {}",
            window.start, window.end, reporting_currency
        );

        let groups = group_by_ticker(&imported.transactions);
        let ledgers: Vec<TickerLedger> = groups
            .par_iter()
            .map(|(ticker, transactions)| build_ledger(ticker, transactions))
            .collect::<std::result::Result<_, _>>()?;

        let tickers: Vec<String> = groups.iter().map(|(ticker, _)| ticker.clone()).collect();
        let bars = self
            .market_data
            .get_daily_bars(
                &tickers,
                window.start,
                window.end,
                &request.instrument_currency,
            )
            .await;

        let registry = self
            .load_fx_rates(&bars.series, &reporting_currency, window)
            .await?;

        let mut daily_positions: Vec<DailyPosition> = Vec::new();
        for ((ticker, _), ledger) in groups.iter().zip(&ledgers) {
            if let Some(series) = bars.series.get(ticker) {
                daily_positions.extend(align_series(
                    ledger,
                    series,
                    &registry,
                    &reporting_currency,
                    window.start,
                    window.end,
                )?);
            }
        }

        let snapshots = aggregate_daily_positions(&daily_positions);

        let mut kept_series: Vec<PriceSeries> = bars.series.values().cloned().collect();
        kept_series.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        let statistics = compute_statistics(&imported.transactions, &daily_positions, &kept_series);

        info!(
            "Report ready: {} tickers valued, {} dropped, {} snapshot days",
            kept_series.len(),
            bars.dropped.len(),
            snapshots.len()
        );

        Ok(PortfolioReport {
            window,
            reporting_currency,
            daily_positions,
            snapshots,
            dropped_tickers: bars.dropped,
            statistics,
        })
    }

    /// Fetches and registers FX series for every instrument currency that
    /// differs from the reporting currency. A pair without a single
    /// observation cannot be carried forward and aborts the run.
    async fn load_fx_rates(
        &self,
        series: &HashMap<String, PriceSeries>,
        reporting_currency: &str,
        window: ReportWindow,
    ) -> Result<FxRateRegistry> {
        let currencies: BTreeSet<String> = series
            .values()
            .map(|s| s.currency.clone())
            .filter(|currency| currency != reporting_currency)
            .collect();

        let mut registry = FxRateRegistry::new();
        for currency in currencies {
            let rates = self
                .market_data
                .get_fx_series(&currency, reporting_currency, window.start, window.end)
                .await?;
            if rates.is_empty() {
                return Err(Error::Fx(FxError::RateNotFound(format!(
                    "No {} -> {} rates for the report window",
                    currency, reporting_currency
                ))));
            }
            registry.add_series(&currency, reporting_currency, rates);
        }

        Ok(registry)
    }
}

fn load_transactions(source: &CsvSource) -> Result<ImportedTransactions> {
    let imported = match source {
        CsvSource::Path(path) => import_file(path)?,
        CsvSource::Bytes(bytes) => import_bytes(bytes)?,
    };
    Ok(imported)
}

fn resolve_window(request: &ReportRequest, transactions: &[Transaction]) -> Result<ReportWindow> {
    let trade_dates = || transactions.iter().map(|t| t.date());
    let (first_trade, last_trade) = match (trade_dates().min(), trade_dates().max()) {
        (Some(first), Some(last)) => (first, last),
        _ => {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "export contains no trades".to_string(),
            )))
        }
    };

    let start = request.start.unwrap_or(first_trade);
    // One day past the last trade, matching the market data fetch span.
    let end = request
        .end
        .unwrap_or_else(|| last_trade.succ_opt().unwrap_or(last_trade));

    if start > end {
        return Err(Error::Validation(ValidationError::InvalidInput(format!(
            "window start {} is after end {}",
            start, end
        ))));
    }

    Ok(ReportWindow { start, end })
}

fn group_by_ticker(transactions: &[Transaction]) -> Vec<(String, Vec<Transaction>)> {
    let mut groups: BTreeMap<String, Vec<Transaction>> = BTreeMap::new();
    for transaction in transactions {
        groups
            .entry(transaction.ticker.clone())
            .or_default()
            .push(transaction.clone());
    }
    groups.into_iter().collect()
}
