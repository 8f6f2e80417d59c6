//! SQLite-backed ledger store.

use std::fs;
use std::path::Path;

use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::store::LedgerStore;
use crate::types::{Position, PositionStatus};
use crate::Result;

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS portfolio (
    symbol        TEXT PRIMARY KEY,
    buy_price     REAL NOT NULL,
    buy_date      TEXT NOT NULL,
    current_price REAL NOT NULL,
    days_held     INTEGER NOT NULL DEFAULT 0,
    status        TEXT NOT NULL,
    quantity      INTEGER NOT NULL,
    investment    REAL NOT NULL,
    pnl           REAL NOT NULL,
    return_pct    REAL NOT NULL
);
"#;

const SELECT_COLUMNS: &str = "symbol, buy_price, buy_date, current_price, days_held, status, \
                              quantity, investment, pnl, return_pct";

/// Ledger store over a single `portfolio` table.
#[derive(Debug)]
pub struct SqliteLedgerStore {
    conn: Connection,
}

impl SqliteLedgerStore {
    /// Open or create a database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Close the connection, surfacing any error from the final flush.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| e.into())
    }
}

fn row_to_position(row: &Row<'_>) -> rusqlite::Result<Position> {
    let status: String = row.get(5)?;
    let status = status
        .parse::<PositionStatus>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;

    Ok(Position {
        symbol: row.get(0)?,
        buy_price: row.get(1)?,
        buy_date: row.get(2)?,
        current_price: row.get(3)?,
        days_held: row.get(4)?,
        status,
        quantity: row.get(6)?,
        investment: row.get(7)?,
        pnl: row.get(8)?,
        return_pct: row.get(9)?,
    })
}

impl LedgerStore for SqliteLedgerStore {
    fn init(&mut self) -> Result<()> {
        self.conn.execute_batch(SCHEMA_SQL)?;
        tracing::debug!("Portfolio schema initialized");
        Ok(())
    }

    fn get(&self, symbol: &str) -> Result<Option<Position>> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM portfolio WHERE symbol = ?1");
        let position = self
            .conn
            .query_row(&sql, params![symbol], row_to_position)
            .optional()?;
        Ok(position)
    }

    fn upsert(&mut self, position: &Position) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO portfolio
            (symbol, buy_price, buy_date, current_price, days_held, status,
             quantity, investment, pnl, return_pct)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ON CONFLICT(symbol) DO UPDATE SET
                buy_price = excluded.buy_price,
                buy_date = excluded.buy_date,
                current_price = excluded.current_price,
                days_held = excluded.days_held,
                status = excluded.status,
                quantity = excluded.quantity,
                investment = excluded.investment,
                pnl = excluded.pnl,
                return_pct = excluded.return_pct
            "#,
            params![
                position.symbol,
                position.buy_price,
                position.buy_date,
                position.current_price,
                position.days_held,
                position.status.as_str(),
                position.quantity,
                position.investment,
                position.pnl,
                position.return_pct,
            ],
        )?;
        Ok(())
    }

    fn delete_all(&mut self) -> Result<usize> {
        Ok(self.conn.execute("DELETE FROM portfolio", [])?)
    }

    fn fetch_all(&self) -> Result<Vec<Position>> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM portfolio ORDER BY symbol");
        let mut stmt = self.conn.prepare(&sql)?;
        let positions = stmt
            .query_map([], row_to_position)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(positions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn store() -> SqliteLedgerStore {
        let mut store = SqliteLedgerStore::open_in_memory().unwrap();
        store.init().unwrap();
        store
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 6).unwrap()
    }

    #[test]
    fn test_upsert_and_get() {
        let mut store = store();
        let pos = Position::open("TCS", 3500.0, 2, date());
        store.upsert(&pos).unwrap();

        assert_eq!(store.get("TCS").unwrap(), Some(pos));
        assert_eq!(store.get("INFY").unwrap(), None);
    }

    #[test]
    fn test_upsert_updates_in_place() {
        let mut store = store();
        store.upsert(&Position::open("TCS", 3500.0, 2, date())).unwrap();
        let mut sold = Position::open("TCS", 3500.0, 2, date()).with_price(3600.0);
        sold.status = PositionStatus::Sold;
        store.upsert(&sold).unwrap();

        let all = store.fetch_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].status, PositionStatus::Sold);
        assert_eq!(all[0].current_price, 3600.0);
    }

    #[test]
    fn test_fetch_all_ordered_by_symbol() {
        let mut store = store();
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
    fn test_delete_all() {
        let mut store = store();
        store.upsert(&Position::open("A", 1.0, 1, date())).unwrap();
        store.upsert(&Position::open("B", 1.0, 1, date())).unwrap();

        assert_eq!(store.delete_all().unwrap(), 2);
        assert!(store.fetch_all().unwrap().is_empty());
        assert_eq!(store.delete_all().unwrap(), 0);
    }

    #[test]
    fn test_init_is_idempotent() {
        let mut store = store();
        store.upsert(&Position::open("A", 1.0, 1, date())).unwrap();
        store.init().unwrap();
        assert_eq!(store.fetch_all().unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_status_is_persistence_error() {
        let store = store();
        store
            .conn
            .execute(
                "INSERT INTO portfolio VALUES ('A', 1.0, '2024-05-06', 1.0, 0, 'Closed', 1, 1.0, 0.0, 0.0)",
                [],
            )
            .unwrap();
        assert!(matches!(store.fetch_all(), Err(Error::Persistence(_))));
    }

    #[test]
    fn test_persistence_across_connections() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("portfolio.db");

        {
            let mut store = SqliteLedgerStore::open(&path).unwrap();
            store.init().unwrap();
            store.upsert(&Position::open("INFY", 1500.0, 4, date())).unwrap();
            store.close().unwrap();
        }

        let mut store = SqliteLedgerStore::open(&path).unwrap();
        store.init().unwrap();
        let all = store.fetch_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].buy_date, date());
        assert_eq!(all[0].investment, 6000.0);
    }
}
