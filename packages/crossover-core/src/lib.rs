//! Crossover Core - Moving-average signals and paper portfolio ledger.
//!
//! This crate provides the core functionality behind the crossover dashboard:
//!
//! - **Signals**: 20/50/200-day SMA crossover classification (Buy/Sell/Hold)
//! - **Portfolio ledger**: one position per symbol with buy, sell and reset
//! - **Refresh**: mark-to-market of open positions with per-row outcomes
//! - **Storage**: SQLite and JSON backed ledger stores
//!
//! # Example
//!
//! ```rust,no_run
//! use crossover_core::portfolio::{Ledger, SqliteLedgerStore};
//!
//! let store = SqliteLedgerStore::open_in_memory()?;
//! let mut ledger = Ledger::open(store)?;
//!
//! ledger.buy("INFY", 1500.0, 10)?;
//! for position in ledger.fetch_all()? {
//!     println!("{} {} @ {}", position.symbol, position.quantity, position.buy_price);
//! }
//! # Ok::<(), crossover_core::Error>(())
//! ```

pub mod config;
pub mod indicators;
pub mod market;
pub mod portfolio;
pub mod signal;
pub mod types;

// Re-export commonly used types
pub use types::{ApiResponse, Bar, Position, PositionStatus, Signal, SignalRow};

// Re-export main functionality
pub use config::{Config, SymbolUniverse};
pub use indicators::sma;
pub use market::{JsonPriceSource, PriceSource, StaticPriceSource};
pub use portfolio::{
    BuyOutcome, JsonLedgerStore, Ledger, LedgerStore, PortfolioSummary, RefreshReport,
    RowOutcome, SqliteLedgerStore,
};
pub use signal::{classify, SignalEngine, SignalReport};

/// Error types for crossover-core operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Ledger store failure, shared by every store backend
    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("No price data available for {0}")]
    DataUnavailable(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<rusqlite::Error> for Error {
    fn from(e: rusqlite::Error) -> Self {
        Error::Persistence(e.to_string())
    }
}

/// Result type for crossover-core operations.
pub type Result<T> = std::result::Result<T, Error>;
