//! Paper portfolio ledger: buy, sell, reset and listing.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::store::LedgerStore;
use super::summary::PortfolioSummary;
use crate::types::{normalize_symbol, Position, PositionStatus};
use crate::{Error, Result};

/// Today's calendar date in local time.
pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Result of a buy request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", content = "position", rename_all = "snake_case")]
pub enum BuyOutcome {
    /// A new Holding row was written
    Opened(Position),
    /// A Holding row already existed and was left untouched
    AlreadyHeld(Position),
}

impl BuyOutcome {
    pub fn position(&self) -> &Position {
        match self {
            BuyOutcome::Opened(p) | BuyOutcome::AlreadyHeld(p) => p,
        }
    }

    pub fn is_opened(&self) -> bool {
        matches!(self, BuyOutcome::Opened(_))
    }
}

/// Ledger of paper positions over an injected store.
///
/// The ledger is the only writer of position rows.
#[derive(Debug)]
pub struct Ledger<S> {
    pub(super) store: S,
}

impl<S: LedgerStore> Ledger<S> {
    /// Wrap `store`, creating its schema if absent.
    pub fn open(mut store: S) -> Result<Self> {
        store.init()?;
        Ok(Self { store })
    }

    /// Release the ledger and hand back its store.
    pub fn close(self) -> S {
        self.store
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Open a position bought today.
    ///
    /// See [`buy_on`](Self::buy_on).
    pub fn buy(&mut self, symbol: &str, price: f64, quantity: u32) -> Result<BuyOutcome> {
        self.buy_on(today(), symbol, price, quantity)
    }

    /// Open a position bought on `buy_date`.
    ///
    /// Buying a symbol that is already held is a no-op and returns
    /// [`BuyOutcome::AlreadyHeld`]; there is no averaging in. A Sold row for
    /// the symbol is replaced by the new holding.
    pub fn buy_on(
        &mut self,
        buy_date: NaiveDate,
        symbol: &str,
        price: f64,
        quantity: u32,
    ) -> Result<BuyOutcome> {
        let symbol = normalize_symbol(symbol);
        if symbol.is_empty() {
            return Err(Error::Validation("symbol must not be empty".to_string()));
        }
        if quantity < 1 {
            return Err(Error::Validation(format!(
                "quantity must be at least 1, got {quantity}"
            )));
        }
        if !price.is_finite() || price <= 0.0 {
            return Err(Error::Validation(format!(
                "price must be positive, got {price}"
            )));
        }

        if let Some(existing) = self.store.get(&symbol)? {
            if existing.is_holding() {
                tracing::debug!("{} already held, ignoring buy", symbol);
                return Ok(BuyOutcome::AlreadyHeld(existing));
            }
        }

        let position = Position::open(&symbol, price, quantity, buy_date);
        self.store.upsert(&position)?;
        tracing::info!("Bought {} shares of {} at {:.2}", quantity, symbol, price);
        Ok(BuyOutcome::Opened(position))
    }

    /// Mark the holding for `symbol` as sold.
    ///
    /// Returns the sold row, or `None` when there is no holding to sell.
    /// Prices and derived fields are frozen at their last stored values.
    pub fn sell(&mut self, symbol: &str) -> Result<Option<Position>> {
        let symbol = normalize_symbol(symbol);
        let Some(mut position) = self.store.get(&symbol)? else {
            return Ok(None);
        };
        if !position.is_holding() {
            return Ok(None);
        }

        position.status = PositionStatus::Sold;
        self.store.upsert(&position)?;
        tracing::info!("Sold all holdings of {}", symbol);
        Ok(Some(position))
    }

    /// Remove every row, returning how many were removed.
    pub fn reset(&mut self) -> Result<usize> {
        let removed = self.store.delete_all()?;
        tracing::info!("Portfolio reset, {} rows removed", removed);
        Ok(removed)
    }

    /// All rows, Holding and Sold, ordered by symbol.
    pub fn fetch_all(&self) -> Result<Vec<Position>> {
        self.store.fetch_all()
    }

    /// Row for `symbol`, if any.
    pub fn position(&self, symbol: &str) -> Result<Option<Position>> {
        self.store.get(&normalize_symbol(symbol))
    }

    /// Aggregate valuation over the stored rows.
    pub fn summary(&self) -> Result<PortfolioSummary> {
        Ok(PortfolioSummary::from_positions(&self.fetch_all()?))
    }
}
