//! Importer for Trading212-style investing CSV exports.
//!
//! The export is one row per account event. Rows whose action label
//! classifies as a buy or sell become [`Transaction`]s; deposits,
//! dividends, interest and fees are skipped. The header is validated up
//! front and every missing required column is reported in one error.

use std::collections::HashMap;
use std::path::Path;

use chrono::{NaiveDateTime, TimeZone, Utc};
use csv::ReaderBuilder;
use log::{debug, warn};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::transactions_constants::{
    COLUMN_ACTION, COLUMN_FX_RATE, COLUMN_PRICE, COLUMN_SHARES, COLUMN_TICKER, COLUMN_TIME,
    FX_NOT_AVAILABLE, REQUIRED_COLUMNS, RESULT_COLUMN_PREFIX, TIME_FORMAT, TIME_FORMAT_NO_SECONDS,
};
use super::transactions_errors::ImportError;
use super::transactions_model::{TradeAction, Transaction};
use crate::constants::DEFAULT_REPORTING_CURRENCY;

/// Result of importing a brokerage export.
#[derive(Debug, Clone)]
pub struct ImportedTransactions {
    /// Trades in file order. Non-trading rows are not included.
    pub transactions: Vec<Transaction>,
    /// Reporting currency detected from the export's result column
    /// header, e.g. "EUR" from "Result (EUR)".
    pub reporting_currency: String,
    /// Number of rows skipped because their action label maps to no
    /// trade.
    pub skipped_rows: usize,
}

/// Imports a brokerage export from a file on disk.
pub fn import_file(path: &Path) -> Result<ImportedTransactions, ImportError> {
    let content = std::fs::read(path)?;
    import_bytes(&content)
}

/// Imports a brokerage export from raw CSV bytes.
pub fn import_bytes(content: &[u8]) -> Result<ImportedTransactions, ImportError> {
    let content = strip_bom(content);

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let column_index: HashMap<&str, usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.as_str(), idx))
        .collect();

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|name| !column_index.contains_key(**name))
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ImportError::MissingRequiredColumns { missing });
    }

    let (result_column, reporting_currency) = detect_result_column(&headers);

    let action_idx = column_index[COLUMN_ACTION];
    let time_idx = column_index[COLUMN_TIME];
    let ticker_idx = column_index[COLUMN_TICKER];
    let shares_idx = column_index[COLUMN_SHARES];
    let price_idx = column_index[COLUMN_PRICE];
    let fx_idx = column_index[COLUMN_FX_RATE];

    let mut transactions = Vec::new();
    let mut skipped_rows = 0usize;

    for (row_index, record) in reader.records().enumerate() {
        let record = record?;
        let field = |idx: usize| record.get(idx).unwrap_or("").trim();

        let label = field(action_idx);
        let action = match TradeAction::from_label(label) {
            Some(action) => action,
            None => {
                debug!("Skipping non-trading row {}: '{}'", row_index + 1, label);
                skipped_rows += 1;
                continue;
            }
        };

        let timestamp = parse_timestamp(field(time_idx), row_index)?;

        let ticker = field(ticker_idx);
        if ticker.is_empty() {
            return Err(ImportError::InvalidRow {
                row: row_index + 1,
                column: COLUMN_TICKER.to_string(),
                message: "ticker is empty".to_string(),
            });
        }

        let quantity = parse_required_decimal(field(shares_idx), row_index, COLUMN_SHARES)?;
        let price = parse_required_decimal(field(price_idx), row_index, COLUMN_PRICE)?;
        let fx_rate = parse_fx_rate(field(fx_idx), row_index)?;
        let realized_result = result_column
            .and_then(|idx| parse_optional_decimal(field(idx), row_index, &headers[idx]));

        transactions.push(Transaction {
            id: Uuid::new_v4().to_string(),
            row_index,
            timestamp,
            ticker: ticker.to_string(),
            action,
            quantity,
            price,
            fx_rate,
            realized_result,
        });
    }

    debug!(
        "Imported {} trades ({} non-trading rows skipped), reporting currency {}",
        transactions.len(),
        skipped_rows,
        reporting_currency
    );

    Ok(ImportedTransactions {
        transactions,
        reporting_currency,
        skipped_rows,
    })
}

/// Strips a UTF-8 BOM (EF BB BF) if present.
fn strip_bom(content: &[u8]) -> &[u8] {
    if content.len() >= 3 && content[0] == 0xEF && content[1] == 0xBB && content[2] == 0xBF {
        &content[3..]
    } else {
        content
    }
}

/// Finds the "Result (<CCY>)" column and the currency code it names.
/// Falls back to the default reporting currency when absent.
fn detect_result_column(headers: &[String]) -> (Option<usize>, String) {
    for (idx, header) in headers.iter().enumerate() {
        if let Some(code) = header
            .strip_prefix(RESULT_COLUMN_PREFIX)
            .and_then(|rest| rest.strip_suffix(')'))
        {
            if !code.is_empty() {
                return (Some(idx), code.to_string());
            }
        }
    }
    (None, DEFAULT_REPORTING_CURRENCY.to_string())
}

fn parse_timestamp(
    value: &str,
    row_index: usize,
) -> Result<chrono::DateTime<Utc>, ImportError> {
    let parsed = NaiveDateTime::parse_from_str(value, TIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, TIME_FORMAT_NO_SECONDS));
    match parsed {
        Ok(naive) => Ok(Utc.from_utc_datetime(&naive)),
        Err(e) => Err(ImportError::InvalidRow {
            row: row_index + 1,
            column: COLUMN_TIME.to_string(),
            message: format!("'{}' is not a recognized timestamp: {}", value, e),
        }),
    }
}

/// Parses a required decimal field: plain form first, scientific
/// notation as fallback. Failure fails the row.
fn parse_required_decimal(
    value: &str,
    row_index: usize,
    column: &str,
) -> Result<Decimal, ImportError> {
    use std::str::FromStr;
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .map_err(|e| ImportError::InvalidRow {
            row: row_index + 1,
            column: column.to_string(),
            message: format!("'{}' is not a decimal: {}", value, e),
        })
}

/// Parses an optional decimal field. Unparseable values degrade to
/// `None` with a warning rather than failing the row.
fn parse_optional_decimal(value: &str, row_index: usize, column: &str) -> Option<Decimal> {
    use std::str::FromStr;
    if value.is_empty() {
        return None;
    }
    match Decimal::from_str(value).or_else(|_| Decimal::from_scientific(value)) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!(
                "Row {}: ignoring unparseable value '{}' in column '{}': {}",
                row_index + 1,
                value,
                column,
                e
            );
            None
        }
    }
}

/// Parses the export's exchange rate into a multiplicative rate toward
/// the reporting currency.
///
/// The export quotes the rate as transaction currency per unit of
/// reporting currency, so the stored rate is its inverse. "Not
/// available" (or an empty cell) means the price is already in the
/// reporting currency and maps to rate 1.
fn parse_fx_rate(value: &str, row_index: usize) -> Result<Decimal, ImportError> {
    if value.is_empty() || value.eq_ignore_ascii_case(FX_NOT_AVAILABLE) {
        return Ok(Decimal::ONE);
    }
    let quoted = parse_required_decimal(value, row_index, COLUMN_FX_RATE)?;
    if quoted.is_zero() {
        return Err(ImportError::InvalidRow {
            row: row_index + 1,
            column: COLUMN_FX_RATE.to_string(),
            message: "exchange rate is zero".to_string(),
        });
    }
    Ok(Decimal::ONE / quoted)
}
