//! Three-way moving average ordering.

use crate::types::Signal;

/// Short, medium and long moving average windows.
pub const SHORT_WINDOW: usize = 20;
pub const MEDIUM_WINDOW: usize = 50;
pub const LONG_WINDOW: usize = 200;

/// Classify the latest bar from its 20/50/200 day averages.
///
/// - any average undefined: Hold
/// - MA200 > MA50 > MA20: Buy
/// - MA20 > MA50 > MA200: Sell
/// - any other ordering, ties included: Hold
pub fn classify(ma20: Option<f64>, ma50: Option<f64>, ma200: Option<f64>) -> Signal {
    let (Some(ma20), Some(ma50), Some(ma200)) = (ma20, ma50, ma200) else {
        return Signal::Hold;
    };

    if ma200 > ma50 && ma50 > ma20 {
        Signal::Buy
    } else if ma20 > ma50 && ma50 > ma200 {
        Signal::Sell
    } else {
        Signal::Hold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buy_ordering() {
        assert_eq!(classify(Some(90.0), Some(95.0), Some(100.0)), Signal::Buy);
    }

    #[test]
    fn test_sell_ordering() {
        assert_eq!(classify(Some(110.0), Some(105.0), Some(100.0)), Signal::Sell);
    }

    #[test]
    fn test_mixed_orderings_hold() {
        assert_eq!(classify(Some(95.0), Some(90.0), Some(100.0)), Signal::Hold);
        assert_eq!(classify(Some(100.0), Some(90.0), Some(95.0)), Signal::Hold);
        assert_eq!(classify(Some(90.0), Some(100.0), Some(95.0)), Signal::Hold);
        assert_eq!(classify(Some(95.0), Some(100.0), Some(90.0)), Signal::Hold);
    }

    #[test]
    fn test_ties_hold() {
        assert_eq!(classify(Some(100.0), Some(100.0), Some(100.0)), Signal::Hold);
        assert_eq!(classify(Some(90.0), Some(100.0), Some(100.0)), Signal::Hold);
    }

    #[test]
    fn test_undefined_average_hold() {
        assert_eq!(classify(None, Some(95.0), Some(100.0)), Signal::Hold);
        assert_eq!(classify(Some(90.0), None, Some(100.0)), Signal::Hold);
        assert_eq!(classify(Some(110.0), Some(105.0), None), Signal::Hold);
    }
}
