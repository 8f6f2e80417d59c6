//! Mark-to-market of open positions.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ledger::{today, Ledger};
use super::store::LedgerStore;
use crate::market::PriceSource;
use crate::types::{normalize_symbol, Position};
use crate::Result;

/// Where a refreshed price came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PriceOrigin {
    Override,
    Market,
}

/// Per-row result of a refresh.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RowOutcome {
    /// New price applied and row persisted
    Repriced {
        symbol: String,
        price: f64,
        origin: PriceOrigin,
    },
    /// No price available; days held updated, old price kept
    Unpriced { symbol: String },
    /// Price lookup or write failed
    Failed { symbol: String, error: String },
}

impl RowOutcome {
    pub fn symbol(&self) -> &str {
        match self {
            RowOutcome::Repriced { symbol, .. }
            | RowOutcome::Unpriced { symbol }
            | RowOutcome::Failed { symbol, .. } => symbol,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RowOutcome::Failed { .. })
    }
}

/// Result of a refresh: the full ledger plus one outcome per Holding row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefreshReport {
    pub positions: Vec<Position>,
    pub outcomes: Vec<RowOutcome>,
}

impl RefreshReport {
    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }

    pub fn repriced_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, RowOutcome::Repriced { .. }))
            .count()
    }
}

impl<S: LedgerStore> Ledger<S> {
    /// Refresh Holding rows as of today.
    ///
    /// See [`refresh_as_of`](Self::refresh_as_of).
    pub fn refresh<P: PriceSource + ?Sized>(
        &mut self,
        overrides: Option<&HashMap<String, f64>>,
        source: &P,
    ) -> Result<RefreshReport> {
        self.refresh_as_of(today(), overrides, source)
    }

    /// Recompute days held and prices of every Holding row.
    ///
    /// A price in `overrides` wins over the price source. Rows with no
    /// price anywhere keep their current price. Sold rows are never
    /// touched, and an empty ledger returns without querying `source`.
    /// Failures are isolated per row.
    pub fn refresh_as_of<P: PriceSource + ?Sized>(
        &mut self,
        today: NaiveDate,
        overrides: Option<&HashMap<String, f64>>,
        source: &P,
    ) -> Result<RefreshReport> {
        let positions = self.store.fetch_all()?;
        if positions.is_empty() {
            return Ok(RefreshReport::default());
        }

        let overrides: HashMap<String, f64> = overrides
            .into_iter()
            .flatten()
            .filter(|(_, price)| price.is_finite())
            .map(|(symbol, price)| (normalize_symbol(symbol), *price))
            .collect();

        let mut outcomes = Vec::new();
        for position in positions.into_iter().filter(Position::is_holding) {
            let outcome = self.refresh_row(position, today, &overrides, source);
            if let RowOutcome::Failed { symbol, error } = &outcome {
                tracing::warn!("Failed to refresh {}: {}", symbol, error);
            }
            outcomes.push(outcome);
        }

        let report = RefreshReport {
            positions: self.store.fetch_all()?,
            outcomes,
        };
        tracing::info!(
            "Refreshed portfolio: {} repriced, {} failed",
            report.repriced_count(),
            report.failed_count()
        );
        Ok(report)
    }

    fn refresh_row<P: PriceSource + ?Sized>(
        &mut self,
        mut position: Position,
        today: NaiveDate,
        overrides: &HashMap<String, f64>,
        source: &P,
    ) -> RowOutcome {
        let symbol = position.symbol.clone();
        position.days_held = position.days_held_as_of(today);

        let mut fetch_error = None;
        let price = match overrides.get(&symbol) {
            Some(&price) => Some((price, PriceOrigin::Override)),
            None => match source.latest_close(&symbol) {
                Ok(price) => price.map(|p| (p, PriceOrigin::Market)),
                Err(e) => {
                    fetch_error = Some(e.to_string());
                    None
                }
            },
        };

        if let Some((price, _)) = price {
            position.current_price = price;
        }
        position.recompute();

        if let Err(e) = self.store.upsert(&position) {
            return RowOutcome::Failed {
                symbol,
                error: e.to_string(),
            };
        }

        match (price, fetch_error) {
            (_, Some(error)) => RowOutcome::Failed { symbol, error },
            (Some((price, origin)), None) => RowOutcome::Repriced {
                symbol,
                price,
                origin,
            },
            (None, None) => RowOutcome::Unpriced { symbol },
        }
    }
}
