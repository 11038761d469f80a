//! Daily alignment of ledger state against market series.
//!
//! For one ticker, builds a continuous valuation series on the union of
//! its trade days and bar days, bounded by the report window and
//! starting no earlier than the first trade. Ledger state forward-fills
//! across days without a trade; the close forward-fills across days
//! without a bar; each day's market value is shares x close x fx.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::valuation_model::DailyPosition;
use crate::constants::DECIMAL_PRECISION;
use crate::errors::Result;
use crate::fx::FxRateRegistry;
use crate::portfolio::ledger::TickerLedger;
use folio_market_data::PriceSeries;

/// Builds the daily valuation series for one ticker.
///
/// The FX registry resolves the instrument currency carried by `bars`
/// into the reporting currency per day; identity pairs need no
/// registered series. An empty ledger or an empty bar series yields an
/// empty result.
pub fn align_series(
    ledger: &TickerLedger,
    bars: &PriceSeries,
    fx: &FxRateRegistry,
    reporting_currency: &str,
    window_start: NaiveDate,
    window_end: NaiveDate,
) -> Result<Vec<DailyPosition>> {
    let first_trade = match ledger.first_date() {
        Some(date) => date,
        None => return Ok(Vec::new()),
    };

    let ledger_days = ledger.last_entry_per_day();
    let closes: BTreeMap<NaiveDate, Decimal> =
        bars.bars.iter().map(|bar| (bar.date, bar.close)).collect();

    // Days ahead of the first bar take the earliest close, mirroring
    // the FX head policy.
    let earliest_close = match closes.values().next() {
        Some(close) => *close,
        None => return Ok(Vec::new()),
    };

    let start = window_start.max(first_trade);
    if start > window_end {
        return Ok(Vec::new());
    }

    // Union axis: trade days and bar days inside the window.
    let mut axis: BTreeSet<NaiveDate> = BTreeSet::new();
    axis.extend(
        ledger_days
            .keys()
            .copied()
            .filter(|day| *day >= start && *day <= window_end),
    );
    axis.extend(
        closes
            .keys()
            .copied()
            .filter(|day| *day >= start && *day <= window_end),
    );

    let mut positions = Vec::with_capacity(axis.len());
    for day in axis {
        // The axis starts no earlier than the first trade, so a prior
        // ledger state always exists.
        let state = match ledger_days.range(..=day).next_back() {
            Some((_, entry)) => *entry,
            None => continue,
        };

        let close = closes
            .range(..=day)
            .next_back()
            .map(|(_, close)| *close)
            .unwrap_or(earliest_close);

        let market_value = fx
            .convert(state.cumulative_shares * close, &bars.currency, reporting_currency, day)?
            .round_dp(DECIMAL_PRECISION);

        positions.push(DailyPosition {
            date: day,
            ticker: ledger.ticker.clone(),
            cumulative_shares: state.cumulative_shares,
            average_cost: state.average_cost,
            close,
            cumulative_invested: state.cumulative_invested,
            market_value,
            realized_profit_to_date: state.realized_profit_to_date,
        });
    }

    Ok(positions)
}
