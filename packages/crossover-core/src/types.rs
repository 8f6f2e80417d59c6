//! Core data types for the crossover dashboard.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Round a monetary or percentage value to two decimals.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Normalise a ticker: trimmed and uppercase.
pub(crate) fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

/// A single daily bar from a price source.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Bar {
    /// Trading date
    pub date: NaiveDate,
    /// Closing price
    pub close: f64,
}

impl Bar {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Trading signal derived from the 20/50/200 day moving averages.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Buy => "Buy",
            Signal::Sell => "Sell",
            Signal::Hold => "Hold",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the signals table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SignalRow {
    /// Stock ticker symbol (uppercase)
    pub symbol: String,
    /// Classification of the latest bar
    pub signal: Signal,
    /// Latest close
    pub current_price: f64,
    /// 20-day simple moving average (None with insufficient history)
    pub ma20: Option<f64>,
    /// 50-day simple moving average
    pub ma50: Option<f64>,
    /// 200-day simple moving average
    pub ma200: Option<f64>,
}

/// Lifecycle state of a ledger row.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PositionStatus {
    Holding,
    Sold,
}

impl PositionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PositionStatus::Holding => "Holding",
            PositionStatus::Sold => "Sold",
        }
    }
}

impl fmt::Display for PositionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PositionStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Holding" => Ok(PositionStatus::Holding),
            "Sold" => Ok(PositionStatus::Sold),
            other => Err(Error::InvalidData(format!("unknown position status: {other}"))),
        }
    }
}

/// A paper-trading position. At most one row exists per symbol.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Position {
    /// Stock ticker symbol (uppercase, unique key)
    pub symbol: String,
    /// Price paid per share
    pub buy_price: f64,
    /// Calendar date of the buy
    pub buy_date: NaiveDate,
    /// Last known market price
    pub current_price: f64,
    /// Number of shares
    pub quantity: u32,
    /// Holding or Sold
    pub status: PositionStatus,
    /// Whole calendar days since the buy date
    pub days_held: u32,
    /// buy_price * quantity
    pub investment: f64,
    /// (current_price - buy_price) * quantity
    pub pnl: f64,
    /// Percentage return over the buy price
    pub return_pct: f64,
}

impl Position {
    /// Open a new holding at `price` on `buy_date`.
    pub fn open(symbol: &str, price: f64, quantity: u32, buy_date: NaiveDate) -> Self {
        let mut position = Self {
            symbol: normalize_symbol(symbol),
            buy_price: price,
            buy_date,
            current_price: price,
            quantity,
            status: PositionStatus::Holding,
            days_held: 0,
            investment: 0.0,
            pnl: 0.0,
            return_pct: 0.0,
        };
        position.recompute();
        position
    }

    pub fn is_holding(&self) -> bool {
        self.status == PositionStatus::Holding
    }

    /// Recalculate investment, P&L and return from price and quantity.
    pub fn recompute(&mut self) {
        let quantity = f64::from(self.quantity);
        self.investment = round2(self.buy_price * quantity);
        self.pnl = round2((self.current_price - self.buy_price) * quantity);
        self.return_pct = if self.buy_price != 0.0 {
            round2((self.current_price / self.buy_price - 1.0) * 100.0)
        } else {
            0.0
        };
    }

    /// Copy of this position marked to `current_price`.
    pub fn with_price(&self, current_price: f64) -> Self {
        let mut position = Self {
            current_price,
            ..self.clone()
        };
        position.recompute();
        position
    }

    /// Calendar days between the buy date and `today`, floored at zero.
    pub fn days_held_as_of(&self, today: NaiveDate) -> u32 {
        let days = (today - self.buy_date).num_days();
        u32::try_from(days.max(0)).unwrap_or(u32::MAX)
    }

    /// Current market value of the position.
    pub fn market_value(&self) -> f64 {
        round2(self.current_price * f64::from(self.quantity))
    }
}

/// API response wrapper used by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response.
    pub fn err(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(error.into()),
        }
    }
}
