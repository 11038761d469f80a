//! Market data retrieval for the folio portfolio engine.
//!
//! This crate defines the provider abstraction ([`MarketDataProvider`])
//! together with the Yahoo Finance implementation, and the wire-agnostic
//! models the rest of the workspace consumes: daily close bars
//! ([`PriceBar`], [`PriceSeries`]) and FX rate observations ([`FxRate`]).
//!
//! Providers return raw daily series; caching, retries over transient
//! failures and forward-filling are the caller's concern.

pub mod errors;
pub mod models;
pub mod provider;

pub use errors::MarketDataError;
pub use models::{FxRate, PriceBar, PriceSeries};
pub use provider::{MarketDataProvider, YahooProvider};
