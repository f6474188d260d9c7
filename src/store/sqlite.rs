//! Local SQLite backend for the record store
//!
//! Uses parameterized queries for all values. Table and column names are
//! validated identifiers and are the only parts formatted into SQL text.

use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use rusqlite::{params, Connection};

use super::{validate_table_name, Filter, RecordStore};
use crate::error::Result;
use crate::models::{InventoryItem, NewInventoryItem, QuantityPatch};

/// Record store backed by a single SQLite connection
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database file and make sure `table` exists
    pub fn open(path: &Path, table: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        log::info!("Opened database: {}", path.display());
        Self::with_connection(conn, table)
    }

    /// In-memory database, gone when the store is dropped
    pub fn open_in_memory(table: &str) -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?, table)
    }

    fn with_connection(conn: Connection, table: &str) -> Result<Self> {
        init_table(&conn, table)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Create the inventory table if it doesn't exist.
///
/// `product_name` is deliberately not UNIQUE here: the hosted table has no
/// such constraint either, uniqueness is checked before insert.
fn init_table(conn: &Connection, table: &str) -> Result<()> {
    validate_table_name(table)?;
    conn.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS {table} (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            product_name TEXT NOT NULL,
            quantity INTEGER NOT NULL DEFAULT 0 CHECK (quantity >= 0)
        );"
    ))?;

    log::info!("Table '{}' ready", table);
    Ok(())
}

fn row_to_item(row: &rusqlite::Row<'_>) -> rusqlite::Result<InventoryItem> {
    Ok(InventoryItem {
        id: row.get(0)?,
        product_name: row.get(1)?,
        quantity: row.get(2)?,
    })
}

impl RecordStore for SqliteStore {
    async fn select(&self, table: &str, filter: Option<&Filter>) -> Result<Vec<InventoryItem>> {
        validate_table_name(table)?;
        let conn = self.lock();

        let items = match filter {
            None => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT id, product_name, quantity FROM {table} ORDER BY id"
                ))?;
                let rows = stmt.query_map([], row_to_item)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
            Some(filter) => {
                // LIMIT -1 means unbounded in SQLite
                let limit = filter
                    .limit
                    .map_or(-1, |n| i64::try_from(n).unwrap_or(i64::MAX));
                let mut stmt = conn.prepare(&format!(
                    "SELECT id, product_name, quantity FROM {table} WHERE {} = ?1 ORDER BY id LIMIT ?2",
                    filter.column.as_str()
                ))?;
                let rows = stmt.query_map(params![&filter.value, limit], row_to_item)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
        };

        log::debug!("Selected {} rows from {}", items.len(), table);
        Ok(items)
    }

    async fn insert(&self, table: &str, row: &NewInventoryItem) -> Result<()> {
        validate_table_name(table)?;
        let conn = self.lock();
        conn.execute(
            &format!("INSERT INTO {table} (product_name, quantity) VALUES (?1, ?2)"),
            params![&row.product_name, row.quantity],
        )?;
        log::debug!("Inserted '{}' into {}", row.product_name, table);
        Ok(())
    }

    async fn update(&self, table: &str, id: i64, patch: &QuantityPatch) -> Result<()> {
        validate_table_name(table)?;
        let conn = self.lock();
        let changed = conn.execute(
            &format!("UPDATE {table} SET quantity = ?1 WHERE id = ?2"),
            params![patch.quantity, id],
        )?;
        log::debug!("Updated {} row(s) in {} for id {}", changed, table, id);
        Ok(())
    }
}
