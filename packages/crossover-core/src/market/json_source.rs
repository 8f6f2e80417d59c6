//! Price snapshot loaded from a JSON file.
//!
//! The file maps each symbol to its daily bars:
//!
//! ```json
//! { "INFY": [{ "date": "2024-01-02", "close": 1520.5 }] }
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::{PriceSource, StaticPriceSource};
use crate::types::Bar;
use crate::Result;

/// Price source reading a JSON snapshot from disk once at load time.
#[derive(Debug, Clone)]
pub struct JsonPriceSource {
    path: PathBuf,
    inner: StaticPriceSource,
}

impl JsonPriceSource {
    /// Load the snapshot at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = fs::read_to_string(&path)?;
        let bars: HashMap<String, Vec<Bar>> = serde_json::from_str(&content)?;
        tracing::debug!("Loaded price snapshot for {} symbols from {}", bars.len(), path.display());

        Ok(Self {
            path,
            inner: StaticPriceSource::from_map(bars),
        })
    }

    /// Get the snapshot path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PriceSource for JsonPriceSource {
    fn daily_closes(&self, symbol: &str, lookback_days: usize) -> Result<Vec<Bar>> {
        self.inner.daily_closes(symbol, lookback_days)
    }
}
