use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::align_series;
use crate::fx::FxRateRegistry;
use crate::portfolio::ledger::{build_ledger, TickerLedger};
use crate::transactions::{TradeAction, Transaction};
use folio_market_data::{FxRate, PriceBar, PriceSeries};

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 5, day).unwrap()
}

fn tx(row: usize, day: u32, action: TradeAction, quantity: Decimal, price: Decimal) -> Transaction {
    Transaction {
        id: format!("tx-{}", row),
        row_index: row,
        timestamp: Utc.with_ymd_and_hms(2023, 5, day, 12, 0, 0).unwrap(),
        ticker: "AAPL".to_string(),
        action,
        quantity,
        price,
        fx_rate: dec!(1),
        realized_result: None,
    }
}

fn ledger(transactions: &[Transaction]) -> TickerLedger {
    build_ledger("AAPL", transactions).unwrap()
}

fn series(currency: &str, closes: &[(u32, Decimal)]) -> PriceSeries {
    PriceSeries {
        symbol: "AAPL".to_string(),
        currency: currency.to_string(),
        bars: closes
            .iter()
            .map(|(day, close)| PriceBar {
                date: date(*day),
                close: *close,
            })
            .collect(),
    }
}

fn usd_eur(rates: &[(u32, Decimal)]) -> FxRateRegistry {
    let mut registry = FxRateRegistry::new();
    registry.add_series(
        "USD",
        "EUR",
        rates
            .iter()
            .map(|(day, rate)| FxRate {
                date: date(*day),
                rate: *rate,
            })
            .collect(),
    );
    registry
}

#[test]
fn test_axis_is_union_of_trade_and_bar_days() {
    let ledger = ledger(&[
        tx(0, 2, TradeAction::Buy, dec!(10), dec!(100)),
        tx(1, 4, TradeAction::Buy, dec!(5), dec!(110)),
    ]);
    let bars = series("EUR", &[(2, dec!(100)), (3, dec!(102)), (5, dec!(105))]);

    let positions = align_series(
        &ledger,
        &bars,
        &FxRateRegistry::new(),
        "EUR",
        date(1),
        date(6),
    )
    .unwrap();

    let days: Vec<NaiveDate> = positions.iter().map(|p| p.date).collect();
    assert_eq!(days, vec![date(2), date(3), date(4), date(5)]);
}

#[test]
fn test_ledger_state_forward_fills_across_bar_days() {
    let ledger = ledger(&[tx(0, 2, TradeAction::Buy, dec!(10), dec!(100))]);
    let bars = series("EUR", &[(2, dec!(100)), (3, dec!(102))]);

    let positions = align_series(
        &ledger,
        &bars,
        &FxRateRegistry::new(),
        "EUR",
        date(1),
        date(6),
    )
    .unwrap();

    let day_three = &positions[1];
    assert_eq!(day_three.cumulative_shares, dec!(10));
    assert_eq!(day_three.cumulative_invested, dec!(1000));
    assert_eq!(day_three.market_value, dec!(1020));
}

#[test]
fn test_close_forward_fills_across_trade_days() {
    let ledger = ledger(&[
        tx(0, 2, TradeAction::Buy, dec!(10), dec!(100)),
        tx(1, 4, TradeAction::Buy, dec!(10), dec!(100)),
    ]);
    // No bar on the second trade day
    let bars = series("EUR", &[(2, dec!(100)), (3, dec!(102))]);

    let positions = align_series(
        &ledger,
        &bars,
        &FxRateRegistry::new(),
        "EUR",
        date(1),
        date(6),
    )
    .unwrap();

    let day_four = positions.iter().find(|p| p.date == date(4)).unwrap();
    assert_eq!(day_four.close, dec!(102));
    assert_eq!(day_four.cumulative_shares, dec!(20));
    assert_eq!(day_four.market_value, dec!(2040));
}

#[test]
fn test_flat_position_values_to_zero() {
    let ledger = ledger(&[
        tx(0, 2, TradeAction::Buy, dec!(10), dec!(100)),
        tx(1, 3, TradeAction::Sell, dec!(10), dec!(110)),
    ]);
    let bars = series("EUR", &[(2, dec!(100)), (3, dec!(110))]);

    let positions = align_series(
        &ledger,
        &bars,
        &FxRateRegistry::new(),
        "EUR",
        date(1),
        date(6),
    )
    .unwrap();

    let day_three = &positions[1];
    assert_eq!(day_three.cumulative_shares, Decimal::ZERO);
    assert_eq!(day_three.market_value, Decimal::ZERO);
    assert_eq!(day_three.average_cost, None);
    assert_eq!(day_three.realized_profit_to_date, dec!(100));
}

#[test]
fn test_weekend_trade_backfills_from_first_bar() {
    // Trade on Saturday, first bar the following Monday
    let ledger = ledger(&[tx(0, 6, TradeAction::Buy, dec!(10), dec!(100))]);
    let bars = series("EUR", &[(8, dec!(104))]);

    let positions = align_series(
        &ledger,
        &bars,
        &FxRateRegistry::new(),
        "EUR",
        date(1),
        date(9),
    )
    .unwrap();

    assert_eq!(positions[0].date, date(6));
    assert_eq!(positions[0].close, dec!(104));
    assert_eq!(positions[0].market_value, dec!(1040));
}

#[test]
fn test_window_clamps_the_axis() {
    let ledger = ledger(&[tx(0, 2, TradeAction::Buy, dec!(10), dec!(100))]);
    let bars = series(
        "EUR",
        &[(1, dec!(99)), (2, dec!(100)), (3, dec!(101)), (4, dec!(102))],
    );

    let positions = align_series(
        &ledger,
        &bars,
        &FxRateRegistry::new(),
        "EUR",
        date(1),
        date(3),
    )
    .unwrap();

    // Starts at the first trade even though a bar exists before it,
    // and stops at the window end.
    let days: Vec<NaiveDate> = positions.iter().map(|p| p.date).collect();
    assert_eq!(days, vec![date(2), date(3)]);
}

#[test]
fn test_fx_rate_forward_fills_mid_series() {
    let ledger = ledger(&[tx(0, 2, TradeAction::Buy, dec!(10), dec!(100))]);
    let bars = series("USD", &[(2, dec!(100)), (3, dec!(100)), (4, dec!(100))]);
    // No FX observation for day 3
    let fx = usd_eur(&[(2, dec!(0.9)), (4, dec!(0.8))]);

    let positions = align_series(&ledger, &bars, &fx, "EUR", date(1), date(6)).unwrap();

    assert_eq!(positions[0].market_value, dec!(900));
    // Day 3 carries the prior day's rate rather than dropping the row
    assert_eq!(positions[1].market_value, dec!(900));
    assert_eq!(positions[2].market_value, dec!(800));
}

#[test]
fn test_identity_currency_needs_no_registry() {
    let ledger = ledger(&[tx(0, 2, TradeAction::Buy, dec!(2), dec!(50))]);
    let bars = series("EUR", &[(2, dec!(51))]);

    let positions = align_series(
        &ledger,
        &bars,
        &FxRateRegistry::new(),
        "EUR",
        date(1),
        date(6),
    )
    .unwrap();

    assert_eq!(positions[0].market_value, dec!(102));
}

#[test]
fn test_gapless_series_uses_each_days_own_close() {
    let ledger = ledger(&[tx(0, 2, TradeAction::Buy, dec!(1), dec!(100))]);
    let closes = [(2, dec!(100)), (3, dec!(101)), (4, dec!(102))];
    let bars = series("EUR", &closes);

    let positions = align_series(
        &ledger,
        &bars,
        &FxRateRegistry::new(),
        "EUR",
        date(1),
        date(6),
    )
    .unwrap();

    for (position, (day, close)) in positions.iter().zip(closes.iter()) {
        assert_eq!(position.date, date(*day));
        assert_eq!(position.close, *close);
        assert_eq!(position.market_value, *close);
    }

    // Realigning the same inputs reproduces the series exactly
    let again = align_series(
        &ledger,
        &bars,
        &FxRateRegistry::new(),
        "EUR",
        date(1),
        date(6),
    )
    .unwrap();
    assert_eq!(again.len(), positions.len());
    for (a, b) in again.iter().zip(positions.iter()) {
        assert_eq!(a.date, b.date);
        assert_eq!(a.market_value, b.market_value);
    }
}

#[test]
fn test_empty_inputs_yield_empty_series() {
    let empty_ledger = TickerLedger {
        ticker: "AAPL".to_string(),
        entries: Vec::new(),
    };
    let bars = series("EUR", &[(2, dec!(100))]);
    let positions = align_series(
        &empty_ledger,
        &bars,
        &FxRateRegistry::new(),
        "EUR",
        date(1),
        date(6),
    )
    .unwrap();
    assert!(positions.is_empty());

    let ledger = ledger(&[tx(0, 2, TradeAction::Buy, dec!(1), dec!(100))]);
    let no_bars = series("EUR", &[]);
    let positions = align_series(
        &ledger,
        &no_bars,
        &FxRateRegistry::new(),
        "EUR",
        date(1),
        date(6),
    )
    .unwrap();
    assert!(positions.is_empty());
}
