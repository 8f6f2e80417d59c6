//! Moving-average crossover signals.
//!
//! Computes the 20/50/200 day simple moving averages of a symbol's daily
//! closes and classifies the latest bar into Buy, Sell or Hold.

mod classify;
mod engine;

pub use classify::{classify, LONG_WINDOW, MEDIUM_WINDOW, SHORT_WINDOW};
pub use engine::{SignalEngine, SignalReport, SkippedSymbol};
