//! Per-symbol signal computation over a price source.

use serde::{Deserialize, Serialize};

use super::classify::{classify, LONG_WINDOW, MEDIUM_WINDOW, SHORT_WINDOW};
use crate::indicators::latest_sma;
use crate::market::{PriceSource, LOOKBACK_DAYS};
use crate::types::{normalize_symbol, round2, SignalRow};
use crate::{Error, Result};

/// A symbol left out of a signal batch and why.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkippedSymbol {
    pub symbol: String,
    pub reason: String,
}

/// Outcome of a signal batch: rows in input order plus skipped symbols.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignalReport {
    pub rows: Vec<SignalRow>,
    pub skipped: Vec<SkippedSymbol>,
}

/// Signal engine over a [`PriceSource`].
#[derive(Debug, Clone)]
pub struct SignalEngine<P> {
    source: P,
    lookback_days: usize,
}

impl<P: PriceSource> SignalEngine<P> {
    /// Create an engine fetching the default 250 day lookback.
    pub fn new(source: P) -> Self {
        Self {
            source,
            lookback_days: LOOKBACK_DAYS,
        }
    }

    /// Override the number of daily bars fetched per symbol.
    pub fn with_lookback(mut self, lookback_days: usize) -> Self {
        self.lookback_days = lookback_days;
        self
    }

    pub fn source(&self) -> &P {
        &self.source
    }

    /// Compute the signal row for one symbol.
    ///
    /// Fails with [`Error::DataUnavailable`] when the source has no usable
    /// closes for the symbol.
    pub fn compute_signal(&self, symbol: &str) -> Result<SignalRow> {
        let symbol = normalize_symbol(symbol);
        let bars = self.source.daily_closes(&symbol, self.lookback_days)?;

        let closes: Vec<f64> = bars
            .iter()
            .map(|bar| bar.close)
            .filter(|close| close.is_finite())
            .collect();
        let Some(&last_close) = closes.last() else {
            return Err(Error::DataUnavailable(symbol));
        };

        let ma20 = latest_sma(&closes, SHORT_WINDOW);
        let ma50 = latest_sma(&closes, MEDIUM_WINDOW);
        let ma200 = latest_sma(&closes, LONG_WINDOW);
        let signal = classify(ma20, ma50, ma200);

        tracing::debug!(
            "{}: {} bars, signal {} (ma20={:?} ma50={:?} ma200={:?})",
            symbol,
            closes.len(),
            signal,
            ma20,
            ma50,
            ma200
        );

        Ok(SignalRow {
            symbol,
            signal,
            current_price: round2(last_close),
            ma20: ma20.map(round2),
            ma50: ma50.map(round2),
            ma200: ma200.map(round2),
        })
    }

    /// Compute signals for `symbols`, skipping those without data.
    ///
    /// Rows keep the input order. A failure for one symbol is logged and
    /// never aborts the batch.
    pub fn analyze_stocks<S: AsRef<str>>(&self, symbols: &[S]) -> Vec<SignalRow> {
        self.analyze_stocks_report(symbols).rows
    }

    /// Like [`analyze_stocks`](Self::analyze_stocks), but also reports the
    /// skipped symbols.
    pub fn analyze_stocks_report<S: AsRef<str>>(&self, symbols: &[S]) -> SignalReport {
        let mut report = SignalReport::default();

        for symbol in symbols {
            let symbol = symbol.as_ref();
            match self.compute_signal(symbol) {
                Ok(row) => report.rows.push(row),
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", symbol, e);
                    report.skipped.push(SkippedSymbol {
                        symbol: normalize_symbol(symbol),
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            "Computed {} signals ({} skipped)",
            report.rows.len(),
            report.skipped.len()
        );
        report
    }
}
