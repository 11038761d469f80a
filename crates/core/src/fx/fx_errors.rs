use thiserror::Error;

/// Errors for FX rate resolution.
#[derive(Error, Debug)]
pub enum FxError {
    #[error("FX rate not found: {0}")]
    RateNotFound(String),
}
