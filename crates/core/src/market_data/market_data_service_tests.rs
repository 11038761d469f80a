use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::MarketDataService;
use folio_market_data::{FxRate, MarketDataError, MarketDataProvider, PriceBar, PriceSeries};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn bars_from(base: Decimal) -> Vec<PriceBar> {
    vec![
        PriceBar {
            date: date(2023, 5, 2),
            close: base,
        },
        PriceBar {
            date: date(2023, 5, 3),
            close: base + dec!(1),
        },
    ]
}

#[derive(Default)]
struct FakeProvider {
    bars: HashMap<String, Vec<PriceBar>>,
    fx: HashMap<(String, String), Vec<FxRate>>,
    transient_failures: AtomicU32,
    fetch_calls: AtomicU32,
}

impl FakeProvider {
    fn with_bars(mut self, symbol: &str, bars: Vec<PriceBar>) -> Self {
        self.bars.insert(symbol.to_string(), bars);
        self
    }

    fn with_fx(mut self, from: &str, to: &str, series: Vec<FxRate>) -> Self {
        self.fx.insert((from.to_string(), to.to_string()), series);
        self
    }

    fn with_transient_failures(self, count: u32) -> Self {
        self.transient_failures.store(count, Ordering::SeqCst);
        self
    }

    fn calls(&self) -> u32 {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    fn take_transient_failure(&self) -> bool {
        self.transient_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl MarketDataProvider for FakeProvider {
    fn id(&self) -> &'static str {
        "FAKE"
    }

    async fn fetch_daily_bars(
        &self,
        symbol: &str,
        _start: NaiveDate,
        _end: NaiveDate,
        fallback_currency: &str,
    ) -> Result<PriceSeries, MarketDataError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.take_transient_failure() {
            return Err(MarketDataError::RateLimited {
                provider: "FAKE".to_string(),
            });
        }
        match self.bars.get(symbol) {
            Some(bars) => Ok(PriceSeries {
                symbol: symbol.to_string(),
                currency: fallback_currency.to_string(),
                bars: bars.clone(),
            }),
            None => Err(MarketDataError::SymbolNotFound(symbol.to_string())),
        }
    }

    async fn fetch_fx_series(
        &self,
        from_currency: &str,
        to_currency: &str,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> Result<Vec<FxRate>, MarketDataError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.take_transient_failure() {
            return Err(MarketDataError::RateLimited {
                provider: "FAKE".to_string(),
            });
        }
        self.fx
            .get(&(from_currency.to_string(), to_currency.to_string()))
            .cloned()
            .ok_or_else(|| {
                MarketDataError::SymbolNotFound(format!("{}{}=X", from_currency, to_currency))
            })
    }
}

fn tickers(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[tokio::test]
async fn test_bulk_fetch_collects_partial_failures() {
    let provider = Arc::new(
        FakeProvider::default()
            .with_bars("AAPL", bars_from(dec!(100)))
            .with_bars("MSFT", bars_from(dec!(300))),
    );
    let service = MarketDataService::new(provider);

    let result = service
        .get_daily_bars(
            &tickers(&["AAPL", "MSFT", "NOPE"]),
            date(2023, 5, 1),
            date(2023, 5, 5),
            "USD",
        )
        .await;

    assert_eq!(result.series.len(), 2);
    assert!(result.series.contains_key("AAPL"));
    assert!(result.series.contains_key("MSFT"));
    assert_eq!(result.dropped.len(), 1);
    assert_eq!(result.dropped[0].ticker, "NOPE");
    assert!(result.dropped[0].reason.contains("NOPE"));
}

#[tokio::test]
async fn test_empty_series_counts_as_drop() {
    let provider = Arc::new(FakeProvider::default().with_bars("GHOST", Vec::new()));
    let service = MarketDataService::new(provider);

    let result = service
        .get_daily_bars(&tickers(&["GHOST"]), date(2023, 5, 1), date(2023, 5, 5), "USD")
        .await;

    assert!(result.series.is_empty());
    assert_eq!(result.dropped.len(), 1);
    assert_eq!(result.dropped[0].ticker, "GHOST");
}

#[tokio::test]
async fn test_transient_failure_retried_until_success() {
    let provider = Arc::new(
        FakeProvider::default()
            .with_bars("AAPL", bars_from(dec!(100)))
            .with_transient_failures(1),
    );
    let service = MarketDataService::new(provider.clone());

    let result = service
        .get_daily_bars(&tickers(&["AAPL"]), date(2023, 5, 1), date(2023, 5, 5), "USD")
        .await;

    assert!(result.dropped.is_empty());
    assert!(result.series.contains_key("AAPL"));
    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn test_transient_failures_exhaust_into_drop() {
    let provider = Arc::new(
        FakeProvider::default()
            .with_bars("AAPL", bars_from(dec!(100)))
            .with_transient_failures(10),
    );
    let service = MarketDataService::new(provider.clone());

    let result = service
        .get_daily_bars(&tickers(&["AAPL"]), date(2023, 5, 1), date(2023, 5, 5), "USD")
        .await;

    assert_eq!(result.dropped.len(), 1);
    assert_eq!(provider.calls(), 3);
}

#[tokio::test]
async fn test_non_transient_failure_not_retried() {
    let provider = Arc::new(FakeProvider::default());
    let service = MarketDataService::new(provider.clone());

    let result = service
        .get_daily_bars(&tickers(&["NOPE"]), date(2023, 5, 1), date(2023, 5, 5), "USD")
        .await;

    assert_eq!(result.dropped.len(), 1);
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_session_cache_prevents_refetch() {
    let provider = Arc::new(FakeProvider::default().with_bars("AAPL", bars_from(dec!(100))));
    let service = MarketDataService::new(provider.clone());

    let symbols = tickers(&["AAPL"]);
    let first = service
        .get_daily_bars(&symbols, date(2023, 5, 1), date(2023, 5, 5), "USD")
        .await;
    let second = service
        .get_daily_bars(&symbols, date(2023, 5, 1), date(2023, 5, 5), "USD")
        .await;

    assert_eq!(first.series["AAPL"].bars, second.series["AAPL"].bars);
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_duplicate_tickers_fetched_once() {
    let provider = Arc::new(FakeProvider::default().with_bars("AAPL", bars_from(dec!(100))));
    let service = MarketDataService::new(provider.clone());

    let result = service
        .get_daily_bars(
            &tickers(&["AAPL", "AAPL", "AAPL"]),
            date(2023, 5, 1),
            date(2023, 5, 5),
            "USD",
        )
        .await;

    assert_eq!(result.series.len(), 1);
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_fx_identity_pair_needs_no_fetch() {
    let provider = Arc::new(FakeProvider::default());
    let service = MarketDataService::new(provider.clone());

    let series = service
        .get_fx_series("EUR", "EUR", date(2023, 5, 1), date(2023, 5, 5))
        .await
        .unwrap();

    assert!(series.is_empty());
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_fx_series_fetched_and_cached() {
    let rates = vec![FxRate {
        date: date(2023, 5, 2),
        rate: dec!(0.92),
    }];
    let provider = Arc::new(FakeProvider::default().with_fx("USD", "EUR", rates.clone()));
    let service = MarketDataService::new(provider.clone());

    let first = service
        .get_fx_series("USD", "EUR", date(2023, 5, 1), date(2023, 5, 5))
        .await
        .unwrap();
    let second = service
        .get_fx_series("USD", "EUR", date(2023, 5, 1), date(2023, 5, 5))
        .await
        .unwrap();

    assert_eq!(first, rates);
    assert_eq!(second, rates);
    assert_eq!(provider.calls(), 1);
}
