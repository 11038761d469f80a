//! Transaction domain models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical trading action vocabulary.
///
/// Raw broker labels are free text ("Market buy", "Limit sell", ...);
/// everything the ledger consumes is reduced to this closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeAction {
    Buy,
    Sell,
}

impl TradeAction {
    /// Classifies a raw broker action label.
    ///
    /// Labels match by case-insensitive substring, so "Market buy",
    /// "Limit buy" and "Stop buy" all map to [`TradeAction::Buy`]. Labels
    /// describing non-trading events (deposits, dividends, fees) return
    /// `None` and take no part in ledger construction.
    pub fn from_label(label: &str) -> Option<Self> {
        let lower = label.to_lowercase();
        if lower.contains("buy") {
            Some(TradeAction::Buy)
        } else if lower.contains("sell") {
            Some(TradeAction::Sell)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TradeAction::Buy => "BUY",
            TradeAction::Sell => "SELL",
        }
    }
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TradeAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TradeAction::from_label(s).ok_or_else(|| format!("Unknown trade action: {}", s))
    }
}

/// A single normalized trade from a brokerage export.
///
/// Quantities, prices and rates are exact decimals and the timestamp is
/// UTC. `row_index` preserves the input file order, which breaks ties
/// between trades sharing a timestamp; cost basis is path dependent, so
/// that order decides every downstream figure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub row_index: usize,
    pub timestamp: DateTime<Utc>,
    pub ticker: String,
    pub action: TradeAction,
    /// Shares traded; always positive, the action carries the sign.
    pub quantity: Decimal,
    /// Price per share in the transaction currency.
    pub price: Decimal,
    /// Multiplicative rate from the transaction currency to the
    /// reporting currency.
    pub fx_rate: Decimal,
    /// Broker-reported realized result in the reporting currency,
    /// informational only.
    pub realized_result: Option<Decimal>,
}

impl Transaction {
    /// Price per share converted into the reporting currency.
    pub fn price_reporting(&self) -> Decimal {
        self.price * self.fx_rate
    }

    /// Calendar day of execution on the UTC axis.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

/// Sorts trades for sequential ledger replay: ascending timestamp,
/// input file order on ties.
pub fn sort_chronologically(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| {
        a.timestamp
            .cmp(&b.timestamp)
            .then(a.row_index.cmp(&b.row_index))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_classification_by_substring() {
        assert_eq!(TradeAction::from_label("Market buy"), Some(TradeAction::Buy));
        assert_eq!(TradeAction::from_label("Limit buy"), Some(TradeAction::Buy));
        assert_eq!(TradeAction::from_label("Market sell"), Some(TradeAction::Sell));
        assert_eq!(TradeAction::from_label("Stop limit SELL"), Some(TradeAction::Sell));
        assert_eq!(TradeAction::from_label("Deposit"), None);
        assert_eq!(TradeAction::from_label("Dividend (Ordinary)"), None);
        assert_eq!(TradeAction::from_label("Interest on cash"), None);
    }

    #[test]
    fn test_action_display() {
        assert_eq!(TradeAction::Buy.to_string(), "BUY");
        assert_eq!(TradeAction::Sell.to_string(), "SELL");
    }
}
