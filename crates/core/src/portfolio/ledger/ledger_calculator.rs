//! Average-cost ledger construction.
//!
//! The ledger is a sequential fold over one ticker's trades in
//! chronological order. Buys add capital at the traded price; sells
//! remove capital at the running average cost, and the difference
//! between sale proceeds and removed capital is that sell's realized
//! profit. The running average is path dependent, so trades sharing a
//! timestamp replay in input file order.

use rust_decimal::Decimal;

use super::ledger_model::{LedgerEntry, TickerLedger};
use crate::errors::LedgerError;
use crate::transactions::{sort_chronologically, TradeAction, Transaction};

/// Builds the ledger for one ticker.
///
/// Transactions may arrive in any order; they are replayed on
/// (timestamp, input row) ascending. All prices enter the ledger
/// converted to the reporting currency.
pub fn build_ledger(
    ticker: &str,
    transactions: &[Transaction],
) -> Result<TickerLedger, LedgerError> {
    for tx in transactions {
        if tx.ticker != ticker {
            return Err(LedgerError::TickerMismatch {
                expected: ticker.to_string(),
                found: tx.ticker.clone(),
            });
        }
        if tx.quantity <= Decimal::ZERO {
            return Err(LedgerError::InvalidQuantity {
                id: tx.id.clone(),
                ticker: tx.ticker.clone(),
                quantity: tx.quantity,
            });
        }
    }

    let mut ordered: Vec<Transaction> = transactions.to_vec();
    sort_chronologically(&mut ordered);

    let mut shares = Decimal::ZERO;
    let mut invested = Decimal::ZERO;
    let mut average_cost: Option<Decimal> = None;
    let mut realized_to_date = Decimal::ZERO;
    let mut entries = Vec::with_capacity(ordered.len());

    for tx in &ordered {
        let price = tx.price_reporting();
        let mut realized = None;

        match tx.action {
            TradeAction::Buy => {
                invested += tx.quantity * price;
                shares += tx.quantity;
            }
            TradeAction::Sell => {
                // Capital leaves at the running average cost, not at the
                // sale price. With no prior position there is no cost to
                // remove and the full proceeds are realized.
                let capital_removed = tx.quantity * average_cost.unwrap_or(Decimal::ZERO);
                invested -= capital_removed;
                shares -= tx.quantity;
                let profit = tx.quantity * price - capital_removed;
                realized_to_date += profit;
                realized = Some(profit);
            }
        }

        // A flat position has no average cost, never a zero sentinel.
        average_cost = if shares.is_zero() {
            None
        } else {
            Some(invested / shares)
        };

        entries.push(LedgerEntry {
            transaction_id: tx.id.clone(),
            ticker: tx.ticker.clone(),
            timestamp: tx.timestamp,
            action: tx.action,
            quantity: tx.quantity,
            price_reporting: price,
            cumulative_shares: shares,
            average_cost,
            cumulative_invested: invested,
            realized_profit: realized,
            realized_profit_to_date: realized_to_date,
        });
    }

    Ok(TickerLedger {
        ticker: ticker.to_string(),
        entries,
    })
}
