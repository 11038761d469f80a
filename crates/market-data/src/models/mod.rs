//! Data models shared between providers and consumers of the crate.

mod series;

pub use series::{FxRate, PriceBar, PriceSeries};
