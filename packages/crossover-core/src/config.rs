//! Configuration and the symbol universe.
//!
//! Configuration lives in a TOML file:
//!
//! ```toml
//! database_path = "/home/me/.crossover/portfolio.db"
//! prices_path = "/home/me/.crossover/prices.json"
//! symbols = ["INFY", "TCS"]
//! symbols_file = "/home/me/.crossover/v40_companies.csv"
//! lookback_days = 250
//! ```

use std::collections::HashSet;
use std::env;
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::market::LOOKBACK_DAYS;
use crate::types::normalize_symbol;
use crate::{Error, Result};

/// Column holding tickers in a symbols CSV file.
const SYMBOL_COLUMN: &str = "Symbol";

fn crossover_dir() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".crossover"))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Dashboard configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// SQLite ledger file
    pub database_path: PathBuf,
    /// JSON price snapshot used as the market data source
    pub prices_path: Option<PathBuf>,
    /// Inline symbol list
    pub symbols: Vec<String>,
    /// CSV file with a `Symbol` column, appended after `symbols`
    pub symbols_file: Option<PathBuf>,
    /// Daily bars fetched per symbol for signal computation
    pub lookback_days: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: Self::default_database_path(),
            prices_path: None,
            symbols: Vec::new(),
            symbols_file: None,
            lookback_days: LOOKBACK_DAYS,
        }
    }
}

impl Config {
    /// Get the default config file path.
    ///
    /// Default path: `~/.crossover/config.toml`
    /// Can be overridden with `CROSSOVER_CONFIG` environment variable.
    pub fn default_path() -> PathBuf {
        if let Ok(path) = env::var("CROSSOVER_CONFIG") {
            return PathBuf::from(path);
        }
        crossover_dir().join("config.toml")
    }

    /// Get the default ledger database path.
    ///
    /// Default path: `~/.crossover/portfolio.db`
    /// Can be overridden with `CROSSOVER_DATABASE` environment variable.
    pub fn default_database_path() -> PathBuf {
        if let Ok(path) = env::var("CROSSOVER_DATABASE") {
            return PathBuf::from(path);
        }
        crossover_dir().join("portfolio.db")
    }

    /// Load config from the default path.
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::default_path())
    }

    /// Load config from a specific path. A missing file yields defaults.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse config from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        if config.lookback_days == 0 {
            return Err(Error::Config("lookback_days must be positive".to_string()));
        }
        Ok(config)
    }

    /// Resolve the configured symbols, inline list first, then the file.
    pub fn symbol_universe(&self) -> Result<SymbolUniverse> {
        let mut symbols = self.symbols.clone();
        if let Some(path) = &self.symbols_file {
            symbols.extend(SymbolUniverse::from_csv_file(path)?.into_vec());
        }
        Ok(SymbolUniverse::from_symbols(symbols))
    }
}

/// Deduplicated, order-preserving list of normalised tickers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolUniverse {
    symbols: Vec<String>,
}

impl SymbolUniverse {
    /// Build from raw symbols, dropping blanks and later duplicates.
    pub fn from_symbols<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let symbols = symbols
            .into_iter()
            .map(|s| normalize_symbol(s.as_ref()))
            .filter(|s| !s.is_empty())
            .filter(|s| seen.insert(s.clone()))
            .collect();
        Self { symbols }
    }

    /// Read the `Symbol` column of a CSV file.
    pub fn from_csv_file(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_csv_reader(BufReader::new(file))
    }

    /// Parse the `Symbol` column of CSV text with a header row.
    pub fn from_csv(content: &str) -> Result<Self> {
        Self::from_csv_reader(content.as_bytes())
    }

    fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let column = reader
            .headers()
            .map_err(|e| Error::Config(format!("symbols file: {}", e)))?
            .iter()
            .position(|name| name.eq_ignore_ascii_case(SYMBOL_COLUMN))
            .ok_or_else(|| {
                Error::Config(format!("symbols file has no '{SYMBOL_COLUMN}' column"))
            })?;

        let mut symbols = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| Error::Config(format!("symbols file: {}", e)))?;
            if let Some(symbol) = record.get(column) {
                symbols.push(symbol.to_string());
            }
        }
        Ok(Self::from_symbols(symbols))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.symbols.iter().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.symbols
    }
}
