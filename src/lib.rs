//! Beverage Inventory - stock tracking page over a hosted record store
//!
//! A single page lists beverage stock, adds new products and records orders.
//! Every change is written to the record store first and followed by a full
//! re-fetch of the inventory table.

pub mod config;
pub mod error;
pub mod language;
pub mod models;
pub mod page;
pub mod session;
pub mod store;
pub mod sync;
pub mod web;

pub use error::{InventoryError, Result};
pub use models::{InventoryItem, InventorySnapshot};
pub use session::{InventorySession, SessionHandle, SessionRegistry};
pub use store::{RecordStore, SqliteStore, SupabaseStore};
pub use sync::{AddOutcome, FetchOutcome, InventorySynchronizer, OrderOutcome};
