//! Record store capability used by the synchronizer
//!
//! The synchronizer only ever needs three calls against a single table:
//! a (optionally filtered) select, an insert and an update by id.
//! Two backends implement them:
//! - [`SupabaseStore`]: hosted table over the PostgREST HTTP API
//! - [`SqliteStore`]: local single-file database

mod rest;
mod sqlite;

pub use rest::SupabaseStore;
pub use sqlite::SqliteStore;

use std::future::Future;

use crate::error::{InventoryError, Result};
use crate::models::{InventoryItem, NewInventoryItem, QuantityPatch};

/// Columns of the inventory table that can appear in a filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    ProductName,
}

impl Column {
    pub fn as_str(&self) -> &'static str {
        match self {
            Column::ProductName => "product_name",
        }
    }
}

/// `WHERE column = value [LIMIT n]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub column: Column,
    pub value: String,
    pub limit: Option<usize>,
}

impl Filter {
    /// Point lookup on `product_name`
    pub fn product_name(name: impl Into<String>) -> Self {
        Self {
            column: Column::ProductName,
            value: name.into(),
            limit: None,
        }
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Table-like store reachable over some API.
///
/// Futures are `Send` so a store can be driven from axum handlers.
pub trait RecordStore: Send + Sync {
    /// Select rows, all of them when `filter` is `None`
    fn select(
        &self,
        table: &str,
        filter: Option<&Filter>,
    ) -> impl Future<Output = Result<Vec<InventoryItem>>> + Send;

    /// Insert one row; the store assigns its id
    fn insert(&self, table: &str, row: &NewInventoryItem)
        -> impl Future<Output = Result<()>> + Send;

    /// Apply `patch` to the row with the given id
    fn update(
        &self,
        table: &str,
        id: i64,
        patch: &QuantityPatch,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// Table names end up in URLs and SQL text, so only plain identifiers are allowed
pub fn validate_table_name(table: &str) -> Result<()> {
    let mut chars = table.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(InventoryError::Config(format!(
            "invalid table name: {:?}",
            table
        )))
    }
}
