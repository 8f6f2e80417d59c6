//! Portfolio valuation summary.

use serde::{Deserialize, Serialize};

use crate::types::{round2, Position};

/// Aggregate valuation over ledger rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PortfolioSummary {
    /// Amount invested in open positions
    pub total_investment: f64,
    /// Market value of open positions
    pub market_value: f64,
    /// Unrealized P&L of open positions
    pub unrealized_pnl: f64,
    /// Unrealized P&L as a percentage of the open investment
    pub unrealized_return_pct: f64,
    /// P&L locked in by sold positions
    pub realized_pnl: f64,
    /// Number of Holding rows
    pub holding_count: usize,
    /// Number of Sold rows
    pub sold_count: usize,
    /// Open positions with a gain
    pub positions_in_profit: usize,
    /// Open positions with a loss
    pub positions_in_loss: usize,
}

impl PortfolioSummary {
    /// Summarise `positions` using their stored prices.
    pub fn from_positions(positions: &[Position]) -> Self {
        let (holding, sold): (Vec<&Position>, Vec<&Position>) =
            positions.iter().partition(|p| p.is_holding());

        let total_investment: f64 = holding.iter().map(|p| p.investment).sum();
        let market_value: f64 = holding.iter().map(|p| p.market_value()).sum();
        let unrealized_pnl: f64 = holding.iter().map(|p| p.pnl).sum();
        let realized_pnl: f64 = sold.iter().map(|p| p.pnl).sum();

        let unrealized_return_pct = if total_investment > 0.0 {
            (unrealized_pnl / total_investment) * 100.0
        } else {
            0.0
        };

        Self {
            total_investment: round2(total_investment),
            market_value: round2(market_value),
            unrealized_pnl: round2(unrealized_pnl),
            unrealized_return_pct: round2(unrealized_return_pct),
            realized_pnl: round2(realized_pnl),
            holding_count: holding.len(),
            sold_count: sold.len(),
            positions_in_profit: holding.iter().filter(|p| p.pnl > 0.0).count(),
            positions_in_loss: holding.iter().filter(|p| p.pnl < 0.0).count(),
        }
    }

    /// Weight of each open position in the open market value.
    pub fn position_weights(positions: &[Position]) -> Vec<(String, f64)> {
        let total_value: f64 = positions
            .iter()
            .filter(|p| p.is_holding())
            .map(|p| p.market_value())
            .sum();
        if total_value <= 0.0 {
            return Vec::new();
        }

        positions
            .iter()
            .filter(|p| p.is_holding())
            .map(|p| (p.symbol.clone(), p.market_value() / total_value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PositionStatus;
    use chrono::NaiveDate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
    }

    fn sample() -> Vec<Position> {
        let infy = Position::open("INFY", 150.0, 10, date()).with_price(175.0);
        let tcs = Position::open("TCS", 100.0, 5, date()).with_price(90.0);
        let mut wipro = Position::open("WIPRO", 50.0, 10, date()).with_price(60.0);
        wipro.status = PositionStatus::Sold;
        vec![infy, tcs, wipro]
    }

    #[test]
    fn test_summary() {
        let summary = PortfolioSummary::from_positions(&sample());

        assert_eq!(summary.total_investment, 2000.0); // 1500 + 500
        assert_eq!(summary.market_value, 2200.0); // 1750 + 450
        assert_eq!(summary.unrealized_pnl, 200.0); // 250 - 50
        assert_eq!(summary.unrealized_return_pct, 10.0);
        assert_eq!(summary.realized_pnl, 100.0);
        assert_eq!(summary.holding_count, 2);
        assert_eq!(summary.sold_count, 1);
        assert_eq!(summary.positions_in_profit, 1); // INFY
        assert_eq!(summary.positions_in_loss, 1); // TCS
    }

    #[test]
    fn test_empty_summary() {
        assert_eq!(PortfolioSummary::from_positions(&[]), PortfolioSummary::default());
    }

    #[test]
    fn test_position_weights() {
        let weights = PortfolioSummary::position_weights(&sample());

        // Sold rows carry no weight
        assert_eq!(weights.len(), 2);
        assert_eq!(weights[0].0, "INFY");
        assert!((weights[0].1 - 1750.0 / 2200.0).abs() < 1e-9);
        assert!((weights[1].1 - 450.0 / 2200.0).abs() < 1e-9);
    }
}
