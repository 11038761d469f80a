//! Daily FX rate registry with gap-tolerant lookups.
//!
//! Rates are stored as independent time series per currency pair, one
//! observation per calendar day. Lookups never thin the date axis: a
//! date without an observation takes the latest prior rate, and dates
//! before the first observation take the earliest one. Identity pairs
//! resolve to 1 without any registered series.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::fx_errors::FxError;
use folio_market_data::FxRate;

/// In-memory registry of daily FX rate series.
#[derive(Debug, Default)]
pub struct FxRateRegistry {
    /// Key: (from_currency, to_currency).
    /// BTreeMap gives O(log n) nearest-date lookups per pair.
    rates: HashMap<(String, String), BTreeMap<NaiveDate, Decimal>>,
}

impl FxRateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a rate series for a currency pair.
    ///
    /// The inverse pair is registered alongside so the registry answers
    /// either orientation. Zero rates are stored forward-only, never
    /// inverted. Identity pairs are ignored.
    pub fn add_series(&mut self, from_currency: &str, to_currency: &str, series: Vec<FxRate>) {
        if from_currency == to_currency {
            return;
        }

        let forward_pair = (from_currency.to_string(), to_currency.to_string());
        let inverse_pair = (to_currency.to_string(), from_currency.to_string());

        for observation in series {
            self.rates
                .entry(forward_pair.clone())
                .or_default()
                .insert(observation.date, observation.rate);

            if !observation.rate.is_zero() {
                self.rates
                    .entry(inverse_pair.clone())
                    .or_default()
                    .insert(observation.date, Decimal::ONE / observation.rate);
            }
        }
    }

    /// Resolves the conversion rate for a date.
    ///
    /// Exact observation first; otherwise the latest observation on or
    /// before the date; for dates ahead of the whole series, the
    /// earliest observation.
    pub fn rate_on(
        &self,
        from_currency: &str,
        to_currency: &str,
        date: NaiveDate,
    ) -> Result<Decimal, FxError> {
        if from_currency == to_currency {
            return Ok(Decimal::ONE);
        }

        let key = (from_currency.to_string(), to_currency.to_string());
        let history = self.rates.get(&key).filter(|h| !h.is_empty()).ok_or_else(|| {
            FxError::RateNotFound(format!(
                "No rates registered for {} -> {}",
                from_currency, to_currency
            ))
        })?;

        if let Some((_, rate)) = history.range(..=date).next_back() {
            return Ok(*rate);
        }

        // Date predates the series head; backfill from the earliest rate.
        match history.iter().next() {
            Some((_, rate)) => Ok(*rate),
            None => Err(FxError::RateNotFound(format!(
                "No rates registered for {} -> {}",
                from_currency, to_currency
            ))),
        }
    }

    /// Converts an amount between currencies on a date.
    pub fn convert(
        &self,
        amount: Decimal,
        from_currency: &str,
        to_currency: &str,
        date: NaiveDate,
    ) -> Result<Decimal, FxError> {
        Ok(amount * self.rate_on(from_currency, to_currency, date)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn make_rate(y: i32, m: u32, d: u32, rate: Decimal) -> FxRate {
        FxRate {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            rate,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_exact_date_match() {
        let mut registry = FxRateRegistry::new();
        registry.add_series("USD", "EUR", vec![make_rate(2023, 10, 25, dec!(0.90))]);

        let rate = registry.rate_on("USD", "EUR", date(2023, 10, 25)).unwrap();
        assert_eq!(rate, dec!(0.90));
    }

    #[test]
    fn test_forward_fill_from_prior_observation() {
        let mut registry = FxRateRegistry::new();
        registry.add_series(
            "USD",
            "EUR",
            vec![
                make_rate(2023, 10, 20, dec!(0.90)),
                make_rate(2023, 10, 30, dec!(0.95)),
            ],
        );

        // Mid-gap dates carry the latest prior rate, not the nearest.
        let rate = registry.rate_on("USD", "EUR", date(2023, 10, 27)).unwrap();
        assert_eq!(rate, dec!(0.90));
    }

    #[test]
    fn test_head_backfill_before_first_observation() {
        let mut registry = FxRateRegistry::new();
        registry.add_series(
            "USD",
            "EUR",
            vec![
                make_rate(2023, 10, 20, dec!(0.90)),
                make_rate(2023, 10, 30, dec!(0.95)),
            ],
        );

        let rate = registry.rate_on("USD", "EUR", date(2023, 10, 1)).unwrap();
        assert_eq!(rate, dec!(0.90));
    }

    #[test]
    fn test_identity_pair_is_one() {
        let registry = FxRateRegistry::new();
        let rate = registry.rate_on("EUR", "EUR", date(2023, 10, 25)).unwrap();
        assert_eq!(rate, Decimal::ONE);
    }

    #[test]
    fn test_inverse_pair_registered() {
        let mut registry = FxRateRegistry::new();
        registry.add_series("USD", "EUR", vec![make_rate(2023, 10, 25, dec!(0.5))]);

        let rate = registry.rate_on("EUR", "USD", date(2023, 10, 25)).unwrap();
        assert_eq!(rate, dec!(2));
    }

    #[test]
    fn test_missing_pair_errors() {
        let registry = FxRateRegistry::new();
        let result = registry.rate_on("USD", "EUR", date(2023, 10, 25));
        assert!(matches!(result, Err(FxError::RateNotFound(_))));
    }

    #[test]
    fn test_convert_applies_rate() {
        let mut registry = FxRateRegistry::new();
        registry.add_series("USD", "EUR", vec![make_rate(2023, 10, 25, dec!(0.90))]);

        let converted = registry
            .convert(dec!(100), "USD", "EUR", date(2023, 10, 25))
            .unwrap();
        assert_eq!(converted, dec!(90.00));
    }

}
