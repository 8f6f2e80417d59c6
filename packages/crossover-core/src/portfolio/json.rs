//! Flat-file ledger store persisted as a JSON document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::store::LedgerStore;
use crate::types::Position;
use crate::{Error, Result};

/// On-disk layout of the ledger file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LedgerDocument {
    positions: Vec<Position>,
    #[serde(skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
}

/// Ledger store that keeps rows in memory and rewrites the whole file on
/// every mutation.
#[derive(Debug)]
pub struct JsonLedgerStore {
    /// Path to the ledger JSON file
    path: PathBuf,
    /// In-memory rows, sorted by symbol
    document: LedgerDocument,
}

impl JsonLedgerStore {
    /// Create a store with the default path.
    ///
    /// Default path: `~/.crossover/portfolio.json`
    /// Can be overridden with `CROSSOVER_PORTFOLIO_FILE` environment variable.
    pub fn new() -> Result<Self> {
        Self::with_path(Self::default_path())
    }

    /// Create a store with a custom path, loading existing rows.
    pub fn with_path(path: PathBuf) -> Result<Self> {
        let document = Self::load_from_path(&path)?;
        Ok(Self { path, document })
    }

    /// Create an in-memory store (no persistence).
    pub fn in_memory() -> Self {
        Self {
            path: PathBuf::new(),
            document: LedgerDocument::default(),
        }
    }

    /// Get the default ledger file path.
    pub fn default_path() -> PathBuf {
        if let Ok(path) = env::var("CROSSOVER_PORTFOLIO_FILE") {
            return PathBuf::from(path);
        }

        directories::BaseDirs::new()
            .map(|dirs| dirs.home_dir().join(".crossover/portfolio.json"))
            .unwrap_or_else(|| PathBuf::from("portfolio.json"))
    }

    /// Get the current path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_from_path(path: &Path) -> Result<LedgerDocument> {
        if !path.exists() {
            return Ok(LedgerDocument::default());
        }

        let content = fs::read_to_string(path)?;
        let mut document: LedgerDocument = serde_json::from_str(&content)?;
        document.positions.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        document.positions.dedup_by(|a, b| a.symbol == b.symbol);
        Ok(document)
    }

    /// Write `positions` to disk, then adopt them as the in-memory rows.
    ///
    /// On a failed write the in-memory rows are left as they were.
    fn commit(&mut self, positions: Vec<Position>) -> Result<()> {
        let mut document = LedgerDocument {
            positions,
            updated_at: self.document.updated_at,
        };

        // Skip if in-memory only
        if !self.path.as_os_str().is_empty() {
            document.updated_at = Some(Utc::now());
            Self::write(&self.path, &document).map_err(|e| {
                Error::Persistence(format!("writing {}: {}", self.path.display(), e))
            })?;
        }

        self.document = document;
        Ok(())
    }

    fn write(path: &Path, document: &LedgerDocument) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(document)?;
        fs::write(path, content)?;
        Ok(())
    }
}

impl LedgerStore for JsonLedgerStore {
    fn init(&mut self) -> Result<()> {
        if self.path.as_os_str().is_empty() || self.path.exists() {
            return Ok(());
        }
        self.commit(self.document.positions.clone())
    }

    fn get(&self, symbol: &str) -> Result<Option<Position>> {
        Ok(self
            .document
            .positions
            .iter()
            .find(|p| p.symbol == symbol)
            .cloned())
    }

    fn upsert(&mut self, position: &Position) -> Result<()> {
        let mut positions = self.document.positions.clone();
        match positions.binary_search_by(|p| p.symbol.cmp(&position.symbol)) {
            Ok(idx) => positions[idx] = position.clone(),
            Err(idx) => positions.insert(idx, position.clone()),
        }
        self.commit(positions)
    }

    fn delete_all(&mut self) -> Result<usize> {
        let removed = self.document.positions.len();
        self.commit(Vec::new())?;
        Ok(removed)
    }

    fn fetch_all(&self) -> Result<Vec<Position>> {
        Ok(self.document.positions.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PositionStatus;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 6).unwrap()
    }

    #[test]
    fn test_upsert_keeps_symbol_order() {
        let mut store = JsonLedgerStore::in_memory();
        for symbol in ["WIPRO", "HDFC", "TCS"] {
            store.upsert(&Position::open(symbol, 100.0, 1, date())).unwrap();
        }
        let symbols: Vec<String> = store
            .fetch_all()
            .unwrap()
            .into_iter()
            .map(|p| p.symbol)
            .collect();
        assert_eq!(symbols, vec!["HDFC", "TCS", "WIPRO"]);
    }

    #[test]
    fn test_upsert_replaces_existing() {
        let mut store = JsonLedgerStore::in_memory();
        store.upsert(&Position::open("TCS", 100.0, 1, date())).unwrap();
        let mut sold = Position::open("TCS", 100.0, 1, date());
        sold.status = PositionStatus::Sold;
        store.upsert(&sold).unwrap();

        assert_eq!(store.fetch_all().unwrap().len(), 1);
        assert_eq!(store.get("TCS").unwrap().unwrap().status, PositionStatus::Sold);
    }

    #[test]
    fn test_init_creates_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data").join("portfolio.json");

        let mut store = JsonLedgerStore::with_path(path.clone()).unwrap();
        assert!(!path.exists());
        store.init().unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_persistence() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("portfolio.json");

        // Create and save
        {
            let mut store = JsonLedgerStore::with_path(path.clone()).unwrap();
            store.upsert(&Position::open("INFY", 1500.0, 4, date())).unwrap();
            store.upsert(&Position::open("TCS", 3500.0, 1, date())).unwrap();
        }

        // Reload and verify
        {
            let mut store = JsonLedgerStore::with_path(path.clone()).unwrap();
            let all = store.fetch_all().unwrap();
            assert_eq!(all.len(), 2);
            assert_eq!(all[0].symbol, "INFY");
            assert_eq!(all[0].buy_date, date());

            assert_eq!(store.delete_all().unwrap(), 2);
        }

        let store = JsonLedgerStore::with_path(path).unwrap();
        assert!(store.fetch_all().unwrap().is_empty());
    }

    #[test]
    fn test_failed_write_leaves_rows_unchanged() {
        let dir = tempdir().unwrap();
        let data = dir.path().join("data");
        let path = data.join("portfolio.json");

        let mut store = JsonLedgerStore::with_path(path.clone()).unwrap();
        store.upsert(&Position::open("INFY", 1500.0, 4, date())).unwrap();

        // Parent directory replaced by a plain file: every write now fails
        fs::remove_dir_all(&data).unwrap();
        fs::write(&data, "").unwrap();

        let result = store.upsert(&Position::open("TCS", 3500.0, 1, date()));
        assert!(matches!(result, Err(Error::Persistence(_))));
        assert!(store.get("TCS").unwrap().is_none());
        assert_eq!(store.fetch_all().unwrap().len(), 1);

        assert!(matches!(store.delete_all(), Err(Error::Persistence(_))));
        assert_eq!(store.fetch_all().unwrap().len(), 1);

        // Once the directory is back, the same write goes through
        fs::remove_file(&data).unwrap();
        store.upsert(&Position::open("TCS", 3500.0, 1, date())).unwrap();
        let reloaded = JsonLedgerStore::with_path(path).unwrap();
        assert_eq!(reloaded.fetch_all().unwrap().len(), 2);
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("portfolio.json");
        fs::write(&path, "not json").unwrap();

        assert!(JsonLedgerStore::with_path(path).is_err());
    }
}
