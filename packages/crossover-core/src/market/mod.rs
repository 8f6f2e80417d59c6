//! Market data sources.
//!
//! The signal engine and portfolio refresh only see the [`PriceSource`]
//! trait; where the bars come from is up to the caller.

mod json_source;
mod static_source;

pub use json_source::JsonPriceSource;
pub use static_source::StaticPriceSource;

use crate::types::{round2, Bar};
use crate::Result;

/// Number of daily bars requested for signal computation.
pub const LOOKBACK_DAYS: usize = 250;

/// Bars requested when only the latest close is needed.
const LATEST_LOOKBACK_DAYS: usize = 2;

/// A source of daily closing prices.
pub trait PriceSource {
    /// Return up to `lookback_days` daily bars for `symbol`, oldest first.
    ///
    /// An empty vector means no data is available for the symbol.
    fn daily_closes(&self, symbol: &str, lookback_days: usize) -> Result<Vec<Bar>>;

    /// Latest close for `symbol`, rounded to two decimals.
    fn latest_close(&self, symbol: &str) -> Result<Option<f64>> {
        let bars = self.daily_closes(symbol, LATEST_LOOKBACK_DAYS)?;
        Ok(bars.last().map(|bar| round2(bar.close)))
    }
}

impl<P: PriceSource + ?Sized> PriceSource for &P {
    fn daily_closes(&self, symbol: &str, lookback_days: usize) -> Result<Vec<Bar>> {
        (**self).daily_closes(symbol, lookback_days)
    }

    fn latest_close(&self, symbol: &str) -> Result<Option<f64>> {
        (**self).latest_close(symbol)
    }
}
