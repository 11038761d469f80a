use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::aggregation_model::PortfolioSnapshot;
use crate::portfolio::valuation::DailyPosition;

/// Sums per-ticker daily positions into one portfolio series.
///
/// Tickers rarely share an identical date axis: one may have traded on a day
/// another sat out, and positions only begin on each ticker's first trade.
/// The portfolio axis is the union of all per-ticker dates, and on days where
/// a ticker has no row its most recent prior position is carried forward.
/// Tickers that have not started yet simply contribute nothing.
pub fn aggregate_daily_positions(positions: &[DailyPosition]) -> Vec<PortfolioSnapshot> {
    if positions.is_empty() {
        return Vec::new();
    }

    let mut by_ticker: HashMap<&str, BTreeMap<NaiveDate, &DailyPosition>> = HashMap::new();
    let mut axis: BTreeSet<NaiveDate> = BTreeSet::new();
    for position in positions {
        by_ticker
            .entry(position.ticker.as_str())
            .or_default()
            .insert(position.date, position);
        axis.insert(position.date);
    }

    let mut snapshots = Vec::with_capacity(axis.len());
    for day in axis {
        let mut total_value = Decimal::ZERO;
        let mut total_invested = Decimal::ZERO;
        let mut realized_profit_to_date = Decimal::ZERO;

        for ticker_positions in by_ticker.values() {
            if let Some((_, position)) = ticker_positions.range(..=day).next_back() {
                total_value += position.market_value;
                total_invested += position.cumulative_invested;
                realized_profit_to_date += position.realized_profit_to_date;
            }
        }

        snapshots.push(PortfolioSnapshot {
            date: day,
            total_value,
            total_invested,
            realized_profit_to_date,
            floating_profit: total_value - total_invested,
        });
    }

    snapshots
}
