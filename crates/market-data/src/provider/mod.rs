//! Provider implementations and the provider trait.

mod traits;
pub mod yahoo;

pub use traits::MarketDataProvider;
pub use yahoo::YahooProvider;
