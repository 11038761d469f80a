//! Ledger domain models.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::transactions::TradeAction;

/// One derived ledger row, one-to-one with the trade it reflects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub transaction_id: String,
    pub ticker: String,
    pub timestamp: DateTime<Utc>,
    pub action: TradeAction,
    pub quantity: Decimal,
    /// Price per share in the reporting currency.
    pub price_reporting: Decimal,
    /// Shares held after this event. Negative when sells run ahead of
    /// buys.
    pub cumulative_shares: Decimal,
    /// Average cost per share after this event; `None` while the
    /// position is flat.
    pub average_cost: Option<Decimal>,
    /// Capital still invested after this event, reporting currency.
    pub cumulative_invested: Decimal,
    /// Profit realized by this event; sells only.
    pub realized_profit: Option<Decimal>,
    /// Running realized profit for this ticker up to this event.
    pub realized_profit_to_date: Decimal,
}

impl LedgerEntry {
    /// Calendar day of the event on the UTC axis.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

/// The ordered ledger of one ticker.
///
/// Selling beyond the held quantity is allowed by policy: the share
/// count goes negative and the same average-cost formulas keep
/// applying. A sell with no prior position removes no capital, so its
/// full proceeds book as realized profit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerLedger {
    pub ticker: String,
    pub entries: Vec<LedgerEntry>,
}

impl TickerLedger {
    /// Day of the first trade, if any.
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.entries.first().map(|e| e.date())
    }

    /// The last ledger state of each calendar day, keyed by day.
    pub fn last_entry_per_day(&self) -> BTreeMap<NaiveDate, &LedgerEntry> {
        let mut per_day = BTreeMap::new();
        for entry in &self.entries {
            per_day.insert(entry.date(), entry);
        }
        per_day
    }

    /// Total realized profit across all events.
    pub fn realized_profit_total(&self) -> Decimal {
        self.entries
            .last()
            .map(|e| e.realized_profit_to_date)
            .unwrap_or(Decimal::ZERO)
    }
}
