//! Simple Moving Average (SMA) indicator.

/// Calculate Simple Moving Average.
///
/// # Arguments
///
/// * `data` - Price series, oldest first
/// * `period` - Lookback period
///
/// # Returns
///
/// Vector of SMA values aligned with `data`. Entries before the window is
/// fully populated are `None`; a zero period yields all `None`.
///
/// # Example
///
/// ```rust
/// use crossover_core::indicators::sma;
///
/// let prices = vec![10.0, 11.0, 12.0, 11.0, 10.0];
/// let sma_values = sma(&prices, 3);
///
/// assert!(sma_values[1].is_none());
/// // SMA at index 2 = (10 + 11 + 12) / 3 = 11.0
/// assert!((sma_values[2].unwrap() - 11.0).abs() < 0.001);
/// ```
pub fn sma(data: &[f64], period: usize) -> Vec<Option<f64>> {
    let n = data.len();
    let mut result = vec![None; n];

    if period == 0 || period > n {
        return result;
    }

    // Calculate first SMA using simple sum
    let mut sum: f64 = data[..period].iter().sum();
    result[period - 1] = Some(sum / period as f64);

    // Use rolling window for subsequent values
    for i in period..n {
        sum = sum - data[i - period] + data[i];
        result[i] = Some(sum / period as f64);
    }

    result
}

/// SMA of the trailing window ending at the last element.
///
/// Equivalent to `sma(data, period).last()` without materialising the
/// whole series.
pub fn latest_sma(data: &[f64], period: usize) -> Option<f64> {
    if period == 0 || period > data.len() {
        return None;
    }
    let window = &data[data.len() - period..];
    Some(window.iter().sum::<f64>() / period as f64)
}
