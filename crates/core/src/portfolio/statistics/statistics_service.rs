use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use num_traits::ToPrimitive;
use rust_decimal::Decimal;

use super::statistics_model::{
    CompositionSlice, CorrelationMatrix, MonthlyActivity, PortfolioStatistics, ReturnRiskPoint,
};
use crate::constants::COMPOSITION_QUANTITY_THRESHOLD;
use crate::portfolio::valuation::DailyPosition;
use crate::transactions::{TradeAction, Transaction};
use folio_market_data::PriceSeries;

/// Assembles the full analytics bundle for a report.
///
/// Monthly activity covers every imported trade, including tickers that were
/// later dropped for missing market data. Composition reads the aligned
/// positions, while correlation and return/risk read the price series that
/// actually resolved.
pub fn compute_statistics(
    transactions: &[Transaction],
    daily_positions: &[DailyPosition],
    price_series: &[PriceSeries],
) -> PortfolioStatistics {
    PortfolioStatistics {
        monthly_activity: monthly_activity(transactions),
        composition: composition(daily_positions),
        correlation: correlation_matrix(price_series),
        return_risk: return_risk(price_series),
    }
}

/// Counts buys and sells per calendar month, ascending. Months without any
/// trade are omitted rather than zero-filled.
pub fn monthly_activity(transactions: &[Transaction]) -> Vec<MonthlyActivity> {
    let mut months: BTreeMap<(i32, u32), (u32, u32)> = BTreeMap::new();
    for transaction in transactions {
        let date = transaction.date();
        let counts = months.entry((date.year(), date.month())).or_default();
        match transaction.action {
            TradeAction::Buy => counts.0 += 1,
            TradeAction::Sell => counts.1 += 1,
        }
    }

    months
        .into_iter()
        .map(|((year, month), (buy_count, sell_count))| MonthlyActivity {
            year,
            month,
            buy_count,
            sell_count,
        })
        .collect()
}

fn is_position_significant(quantity: &Decimal) -> bool {
    let threshold = Decimal::from_str_radix(COMPOSITION_QUANTITY_THRESHOLD, 10)
        .unwrap_or_else(|_| Decimal::new(25, 2));
    *quantity > threshold
}

/// Splits the portfolio's market value on the final valued date across the
/// tickers still meaningfully held. Weights sum to 1 over the included
/// tickers; an all-flat portfolio yields no slices.
pub fn composition(daily_positions: &[DailyPosition]) -> Vec<CompositionSlice> {
    let final_date = match daily_positions.iter().map(|p| p.date).max() {
        Some(date) => date,
        None => return Vec::new(),
    };

    let mut held: Vec<&DailyPosition> = daily_positions
        .iter()
        .filter(|p| p.date == final_date && is_position_significant(&p.cumulative_shares))
        .collect();
    held.sort_by(|a, b| a.ticker.cmp(&b.ticker));

    let total: Decimal = held.iter().map(|p| p.market_value).sum();
    if total.is_zero() {
        return Vec::new();
    }

    held.into_iter()
        .map(|p| CompositionSlice {
            ticker: p.ticker.clone(),
            market_value: p.market_value,
            weight: p.market_value / total,
        })
        .collect()
}

/// Pearson correlation of daily close returns for every ticker pair, in the
/// order the series are given. Each pair is correlated over the dates both
/// tickers observed; pairs with fewer than two shared return observations or
/// no price movement are undefined.
pub fn correlation_matrix(price_series: &[PriceSeries]) -> CorrelationMatrix {
    let tickers: Vec<String> = price_series.iter().map(|s| s.symbol.clone()).collect();
    let returns: Vec<BTreeMap<NaiveDate, f64>> =
        price_series.iter().map(daily_simple_returns).collect();

    let mut values = vec![vec![None; tickers.len()]; tickers.len()];
    for i in 0..tickers.len() {
        values[i][i] = Some(1.0);
        for j in (i + 1)..tickers.len() {
            let mut xs = Vec::new();
            let mut ys = Vec::new();
            for (date, x) in &returns[i] {
                if let Some(y) = returns[j].get(date) {
                    xs.push(*x);
                    ys.push(*y);
                }
            }
            let coefficient = pearson(&xs, &ys);
            values[i][j] = coefficient;
            values[j][i] = coefficient;
        }
    }

    CorrelationMatrix { tickers, values }
}

/// Mean and sample standard deviation (n - 1) of each ticker's daily returns.
/// Tickers with fewer than two returns carry no meaningful dispersion and are
/// omitted.
pub fn return_risk(price_series: &[PriceSeries]) -> Vec<ReturnRiskPoint> {
    let mut points = Vec::new();
    for series in price_series {
        let returns: Vec<f64> = daily_simple_returns(series).into_values().collect();
        if returns.len() < 2 {
            continue;
        }
        let n = returns.len() as f64;
        let mean = returns.iter().sum::<f64>() / n;
        let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
        points.push(ReturnRiskPoint {
            ticker: series.symbol.clone(),
            mean_daily_return: mean,
            daily_return_std: variance.sqrt(),
        });
    }
    points
}

/// Simple returns between consecutive observed bars, keyed by the later date.
/// Statistics run in f64; monetary amounts elsewhere stay in Decimal.
fn daily_simple_returns(series: &PriceSeries) -> BTreeMap<NaiveDate, f64> {
    let mut returns = BTreeMap::new();
    for pair in series.bars.windows(2) {
        let (prev, curr) = (&pair[0], &pair[1]);
        if prev.close.is_zero() {
            continue;
        }
        let simple = curr.close / prev.close - Decimal::ONE;
        if let Some(value) = simple.to_f64() {
            returns.insert(curr.date, value);
        }
    }
    returns
}

fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() < 2 || xs.len() != ys.len() {
        return None;
    }
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut variance_x = 0.0;
    let mut variance_y = 0.0;
    for (x, y) in xs.iter().zip(ys.iter()) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        covariance += dx * dy;
        variance_x += dx * dx;
        variance_y += dy * dy;
    }
    if variance_x == 0.0 || variance_y == 0.0 {
        return None;
    }
    Some(covariance / (variance_x.sqrt() * variance_y.sqrt()))
}
