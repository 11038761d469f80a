use thiserror::Error;

/// Errors raised while importing a brokerage export.
#[derive(Error, Debug)]
pub enum ImportError {
    /// One or more required columns are absent from the header row.
    /// All missing names are reported together, not just the first.
    #[error("Input is missing required columns: {}", missing.join(", "))]
    MissingRequiredColumns { missing: Vec<String> },

    #[error("Row {row}: failed to parse column '{column}': {message}")]
    InvalidRow {
        row: usize,
        column: String,
        message: String,
    },

    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing failed: {0}")]
    Csv(#[from] csv::Error),
}
