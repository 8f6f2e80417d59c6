//! Paper portfolio management.
//!
//! Provides the position ledger, price refresh, valuation summary and the
//! storage backends behind them.

mod json;
mod ledger;
mod refresh;
mod sqlite;
mod store;
mod summary;

pub use json::JsonLedgerStore;
pub use ledger::{BuyOutcome, Ledger};
pub use refresh::{PriceOrigin, RefreshReport, RowOutcome};
pub use sqlite::SqliteLedgerStore;
pub use store::LedgerStore;
pub use summary::PortfolioSummary;
