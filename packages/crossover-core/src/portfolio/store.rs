//! Storage seam for the portfolio ledger.

use crate::types::Position;
use crate::Result;

/// Persistent storage for ledger rows, keyed by symbol.
///
/// Implementations hold at most one row per symbol. Writing a row whose
/// symbol already exists updates that row in place. A failed write is
/// reported as [`Error::Persistence`](crate::Error::Persistence) and leaves
/// the stored rows as they were.
pub trait LedgerStore {
    /// Create the backing table or file if it does not exist yet.
    fn init(&mut self) -> Result<()>;

    /// Look up the row for an already-normalised symbol.
    fn get(&self, symbol: &str) -> Result<Option<Position>>;

    /// Insert `position`, or overwrite the existing row with its symbol.
    fn upsert(&mut self, position: &Position) -> Result<()>;

    /// Remove every row, returning how many were removed.
    fn delete_all(&mut self) -> Result<usize>;

    /// All rows ordered by symbol.
    fn fetch_all(&self) -> Result<Vec<Position>>;
}
