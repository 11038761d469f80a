//! FX module - daily rate series and reporting-currency conversion.

mod fx_errors;
mod fx_service;

pub use fx_errors::FxError;
pub use fx_service::FxRateRegistry;
