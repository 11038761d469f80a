/// Header of the raw action label column
pub const COLUMN_ACTION: &str = "Action";

/// Header of the execution timestamp column
pub const COLUMN_TIME: &str = "Time";

/// Header of the ticker symbol column
pub const COLUMN_TICKER: &str = "Ticker";

/// Header of the share quantity column
pub const COLUMN_SHARES: &str = "No. of shares";

/// Header of the per-share price column, in the transaction currency
pub const COLUMN_PRICE: &str = "Price / share";

/// Header of the exchange rate column, quoted as transaction currency per
/// unit of reporting currency
pub const COLUMN_FX_RATE: &str = "Exchange rate";

/// Columns an export must carry to be importable
pub const REQUIRED_COLUMNS: [&str; 6] = [
    COLUMN_ACTION,
    COLUMN_TIME,
    COLUMN_TICKER,
    COLUMN_SHARES,
    COLUMN_PRICE,
    COLUMN_FX_RATE,
];

/// Prefix of the optional realized result column, e.g. "Result (EUR)".
/// The currency code inside the parentheses names the export's reporting
/// currency.
pub const RESULT_COLUMN_PREFIX: &str = "Result (";

/// Timestamp format of the `Time` column
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Fallback timestamp format for exports that omit seconds
pub const TIME_FORMAT_NO_SECONDS: &str = "%Y-%m-%d %H:%M";

/// Literal the export writes when no currency conversion applied
pub const FX_NOT_AVAILABLE: &str = "Not available";
