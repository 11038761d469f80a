//! Session-scoped market data orchestration.
//!
//! Wraps a provider with bulk fetching, bounded retries over transient
//! failures and a per-session cache. Per-symbol failures become entries
//! in the dropped-ticker report instead of failing the run.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use dashmap::DashMap;
use futures::future::join_all;
use log::{debug, warn};

use super::market_data_model::{BulkBarsResult, DroppedTicker};
use folio_market_data::{FxRate, MarketDataError, MarketDataProvider, PriceSeries};

/// Symbols fetched concurrently per batch.
const FETCH_BATCH_SIZE: usize = 10;

/// Attempts per symbol before a transient failure becomes a drop.
const MAX_FETCH_ATTEMPTS: u32 = 3;

/// Base delay of the exponential backoff between attempts.
const RETRY_BASE_DELAY_MS: u64 = 500;

/// Market data access for one report run.
pub struct MarketDataService {
    provider: Arc<dyn MarketDataProvider>,
    bar_cache: DashMap<(String, NaiveDate, NaiveDate, String), PriceSeries>,
    fx_cache: DashMap<(String, String, NaiveDate, NaiveDate), Vec<FxRate>>,
}

impl MarketDataService {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self {
            provider,
            bar_cache: DashMap::new(),
            fx_cache: DashMap::new(),
        }
    }

    /// Fetches daily bars for the distinct ticker set in bounded
    /// concurrent batches.
    ///
    /// Failures are per symbol: an unresolvable ticker lands in the
    /// dropped list with its reason while the rest of the set proceeds.
    /// A series with no bars for the whole window also counts as a
    /// drop. Tickers are fetched in sorted order, so the dropped list
    /// is deterministic.
    pub async fn get_daily_bars(
        &self,
        tickers: &[String],
        start: NaiveDate,
        end: NaiveDate,
        fallback_currency: &str,
    ) -> BulkBarsResult {
        let mut distinct: Vec<String> = tickers.to_vec();
        distinct.sort();
        distinct.dedup();

        let mut result = BulkBarsResult::default();

        for chunk in distinct.chunks(FETCH_BATCH_SIZE) {
            let futures: Vec<_> = chunk
                .iter()
                .map(|ticker| {
                    let ticker = ticker.clone();
                    async move {
                        match self
                            .bars_cached(&ticker, start, end, fallback_currency)
                            .await
                        {
                            Ok(series) => Ok((ticker, series)),
                            Err(e) => Err((ticker, e)),
                        }
                    }
                })
                .collect();

            for outcome in join_all(futures).await {
                match outcome {
                    Ok((ticker, series)) if series.is_empty() => {
                        result.dropped.push(DroppedTicker {
                            ticker,
                            reason: MarketDataError::NoDataForRange.to_string(),
                        });
                    }
                    Ok((ticker, series)) => {
                        result.series.insert(ticker, series);
                    }
                    Err((ticker, error)) => {
                        result.dropped.push(DroppedTicker {
                            ticker,
                            reason: error.to_string(),
                        });
                    }
                }
            }
        }

        if !result.dropped.is_empty() {
            warn!(
                "Dropped {} of {} tickers: {:?}",
                result.dropped.len(),
                distinct.len(),
                result
                    .dropped
                    .iter()
                    .map(|d| d.ticker.as_str())
                    .collect::<Vec<_>>()
            );
        }

        result
    }

    /// Fetches the FX series for a currency pair. Identity pairs need
    /// no series and yield nothing.
    pub async fn get_fx_series(
        &self,
        from_currency: &str,
        to_currency: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<FxRate>, MarketDataError> {
        if from_currency == to_currency {
            return Ok(Vec::new());
        }

        let key = (
            from_currency.to_string(),
            to_currency.to_string(),
            start,
            end,
        );
        if let Some(hit) = self.fx_cache.get(&key) {
            debug!("FX cache hit for {} -> {}", from_currency, to_currency);
            return Ok(hit.clone());
        }

        let pair = format!("{} -> {}", from_currency, to_currency);
        let series = retry_transient(&pair, MAX_FETCH_ATTEMPTS, || {
            self.provider
                .fetch_fx_series(from_currency, to_currency, start, end)
        })
        .await?;

        self.fx_cache.insert(key, series.clone());
        Ok(series)
    }

    async fn bars_cached(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
        fallback_currency: &str,
    ) -> Result<PriceSeries, MarketDataError> {
        let key = (
            ticker.to_string(),
            start,
            end,
            fallback_currency.to_string(),
        );
        if let Some(hit) = self.bar_cache.get(&key) {
            debug!("Bar cache hit for {}", ticker);
            return Ok(hit.clone());
        }

        let series = retry_transient(ticker, MAX_FETCH_ATTEMPTS, || {
            self.provider
                .fetch_daily_bars(ticker, start, end, fallback_currency)
        })
        .await?;

        self.bar_cache.insert(key, series.clone());
        Ok(series)
    }
}

/// Runs an operation with exponential backoff over transient failures.
/// Non-transient failures surface immediately.
async fn retry_transient<T, F, Fut>(
    what: &str,
    max_attempts: u32,
    mut operation: F,
) -> Result<T, MarketDataError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, MarketDataError>>,
{
    let mut attempt: u32 = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) if error.is_transient() && attempt + 1 < max_attempts => {
                let delay = RETRY_BASE_DELAY_MS * 2u64.pow(attempt);
                warn!(
                    "Transient failure fetching {} (attempt {} of {}): {}. Retrying in {}ms",
                    what,
                    attempt + 1,
                    max_attempts,
                    error,
                    delay
                );
                tokio::time::sleep(Duration::from_millis(delay)).await;
                attempt += 1;
            }
            Err(error) => return Err(error),
        }
    }
}
