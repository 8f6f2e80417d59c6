//! Technical indicators for trading analysis.
//!
//! - **SMA**: Simple Moving Average, undefined until its window fills

mod sma;

pub use sma::{latest_sma, sma};
