//! In-memory price source.

use std::collections::HashMap;

use chrono::{Days, NaiveDate};

use super::PriceSource;
use crate::types::{normalize_symbol, Bar};
use crate::Result;

/// Price source backed by an in-memory map of symbol to bars.
#[derive(Debug, Clone, Default)]
pub struct StaticPriceSource {
    bars: HashMap<String, Vec<Bar>>,
}

impl StaticPriceSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a source from a symbol to bars map.
    pub fn from_map(bars: HashMap<String, Vec<Bar>>) -> Self {
        let mut source = Self::new();
        for (symbol, series) in bars {
            source.insert(&symbol, series);
        }
        source
    }

    /// Set the bars for `symbol`, replacing any previous series.
    ///
    /// Bars are kept sorted by date.
    pub fn insert(&mut self, symbol: &str, mut bars: Vec<Bar>) {
        bars.sort_by_key(|bar| bar.date);
        self.bars.insert(normalize_symbol(symbol), bars);
    }

    /// Set consecutive daily closes for `symbol` starting at `start`.
    pub fn insert_closes(&mut self, symbol: &str, start: NaiveDate, closes: &[f64]) {
        let bars = closes
            .iter()
            .enumerate()
            .filter_map(|(i, &close)| {
                start
                    .checked_add_days(Days::new(i as u64))
                    .map(|date| Bar::new(date, close))
            })
            .collect();
        self.insert(symbol, bars);
    }

    /// Builder form of [`insert_closes`](Self::insert_closes).
    pub fn with_closes(mut self, symbol: &str, start: NaiveDate, closes: &[f64]) -> Self {
        self.insert_closes(symbol, start, closes);
        self
    }

    /// Symbols with at least one bar.
    pub fn symbols(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = self.bars.keys().map(String::as_str).collect();
        symbols.sort_unstable();
        symbols
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

impl PriceSource for StaticPriceSource {
    fn daily_closes(&self, symbol: &str, lookback_days: usize) -> Result<Vec<Bar>> {
        let Some(series) = self.bars.get(&normalize_symbol(symbol)) else {
            return Ok(Vec::new());
        };
        let start = series.len().saturating_sub(lookback_days);
        Ok(series[start..].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn test_lookback_returns_tail() {
        let source = StaticPriceSource::new().with_closes("INFY", start(), &[1.0, 2.0, 3.0, 4.0]);
        let bars = source.daily_closes("INFY", 2).unwrap();

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].close, 3.0);
        assert_eq!(bars[1].close, 4.0);
        assert_eq!(bars[1].date, NaiveDate::from_ymd_opt(2024, 1, 4).unwrap());
    }

    #[test]
    fn test_unknown_symbol_is_empty() {
        let source = StaticPriceSource::new();
        assert!(source.daily_closes("TCS", 250).unwrap().is_empty());
        assert_eq!(source.latest_close("TCS").unwrap(), None);
    }

    #[test]
    fn test_latest_close_rounded() {
        let source = StaticPriceSource::new().with_closes("tcs", start(), &[10.0, 12.3456]);
        assert_eq!(source.latest_close("TCS").unwrap(), Some(12.35));
    }

    #[test]
    fn test_insert_sorts_by_date() {
        let mut source = StaticPriceSource::new();
        source.insert(
            "X",
            vec![
                Bar::new(NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(), 3.0),
                Bar::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 1.0),
            ],
        );
        let bars = source.daily_closes("X", 10).unwrap();
        assert_eq!(bars[0].close, 1.0);
        assert_eq!(source.latest_close("X").unwrap(), Some(3.0));
        assert_eq!(source.symbols(), vec!["X"]);
    }
}
