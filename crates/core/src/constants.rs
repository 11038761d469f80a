/// Default reporting currency for reports and exports
pub const DEFAULT_REPORTING_CURRENCY: &str = "EUR";

/// Instrument currency assumed when the provider does not report one
pub const DEFAULT_INSTRUMENT_CURRENCY: &str = "USD";

/// Decimal precision for valuation calculations
pub const DECIMAL_PRECISION: u32 = 6;

/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Quantity threshold for positions included in the composition breakdown
pub const COMPOSITION_QUANTITY_THRESHOLD: &str = "0.25";
