//! Inventory synchronizer
//!
//! Keeps a session's snapshot in line with the record store. Every mutation
//! is written to the store first and followed by a full re-fetch; nothing is
//! changed locally ahead of the store.
//!
//! Failures never escalate. Each operation reports what happened through an
//! outcome value the caller is free to ignore, which is what the page does
//! for everything except the duplicate-name notice.
//!
//! The duplicate check in [`InventorySynchronizer::add_item`] and the insert
//! that follows are two separate round-trips. Two concurrent adds of the same
//! name can both pass the check and both insert.

use log::{debug, error, info};

use crate::error::{InventoryError, Result};
use crate::models::{InventorySnapshot, NewInventoryItem, QuantityPatch};
use crate::session::{Notice, SessionHandle};
use crate::store::{validate_table_name, Filter, RecordStore};

/// Default name of the inventory table
pub const DEFAULT_TABLE: &str = "inventory";

/// Result of [`InventorySynchronizer::fetch_inventory`]
#[derive(Debug)]
pub enum FetchOutcome {
    /// Snapshot replaced, with this many items
    Refreshed(usize),
    /// Store call failed, previous snapshot kept
    Failed(InventoryError),
}

/// Result of [`InventorySynchronizer::add_item`]
#[derive(Debug)]
pub enum AddOutcome {
    /// Name was empty, nothing was sent
    EmptyName,
    /// A row with this name already exists, user was notified
    Duplicate,
    /// The duplicate lookup itself failed
    CheckFailed(InventoryError),
    InsertFailed(InventoryError),
    /// Row inserted; carries the outcome of the follow-up fetch
    Added(FetchOutcome),
}

/// Why an order was dropped before reaching the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderRejection {
    NoItemSelected,
    NonPositiveQuantity,
    InvalidItemId,
    /// Id not present in the current (possibly stale) snapshot
    UnknownItem,
    QuantityOverflow,
}

/// Result of [`InventorySynchronizer::order_item`]
#[derive(Debug)]
pub enum OrderOutcome {
    Rejected(OrderRejection),
    UpdateFailed(InventoryError),
    Ordered {
        id: i64,
        new_quantity: i64,
        refresh: FetchOutcome,
    },
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Refreshed(_))
    }
}

impl AddOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AddOutcome::Added(_))
    }
}

impl OrderOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, OrderOutcome::Ordered { .. })
    }
}

/// Mediates all reads and writes between a session and the record store
pub struct InventorySynchronizer<S> {
    store: S,
    table: String,
}

impl<S: RecordStore> InventorySynchronizer<S> {
    pub fn new(store: S, table: impl Into<String>) -> Result<Self> {
        let table = table.into();
        validate_table_name(&table)?;
        Ok(Self { store, table })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Replace the session snapshot with all rows of the table.
    ///
    /// On failure the old snapshot stays in place. Overlapping calls are not
    /// sequenced: whichever response arrives last wins, and the first call to
    /// finish already clears the loading flag.
    pub async fn fetch_inventory(&self, session: &SessionHandle) -> FetchOutcome {
        session.with(|s| s.loading = true);

        let outcome = match self.store.select(&self.table, None).await {
            Ok(items) => {
                let count = items.len();
                session.with(|s| s.snapshot = InventorySnapshot::new(items));
                debug!("Fetched {} inventory items", count);
                FetchOutcome::Refreshed(count)
            }
            Err(e) => {
                debug!("Fetching inventory failed, keeping previous snapshot: {}", e);
                FetchOutcome::Failed(e)
            }
        };

        session.with(|s| s.loading = false);
        outcome
    }

    /// Add a new product with quantity 0, unless the name is empty or taken
    pub async fn add_item(&self, session: &SessionHandle, name: &str) -> AddOutcome {
        if name.is_empty() {
            return AddOutcome::EmptyName;
        }

        let filter = Filter::product_name(name).limit(1);
        let existing = match self.store.select(&self.table, Some(&filter)).await {
            Ok(rows) => rows,
            Err(e) => {
                error!("Error checking duplicates: {}", e);
                return AddOutcome::CheckFailed(e);
            }
        };

        if !existing.is_empty() {
            info!("Item '{}' already exists, not adding", name);
            session.with(|s| s.notice = Some(Notice::ItemAlreadyExists));
            return AddOutcome::Duplicate;
        }

        if let Err(e) = self
            .store
            .insert(&self.table, &NewInventoryItem::named(name))
            .await
        {
            debug!("Insert of '{}' failed: {}", name, e);
            return AddOutcome::InsertFailed(e);
        }

        info!("Added item '{}'", name);
        session.with(|s| s.form.new_item.clear());
        AddOutcome::Added(self.fetch_inventory(session).await)
    }

    /// Increase an item's quantity by `quantity`.
    ///
    /// The new value is computed from the cached snapshot, not from a fresh
    /// read, so a stale snapshot overwrites whatever the store holds.
    pub async fn order_item(
        &self,
        session: &SessionHandle,
        item_id: &str,
        quantity: i64,
    ) -> OrderOutcome {
        if item_id.is_empty() {
            return OrderOutcome::Rejected(OrderRejection::NoItemSelected);
        }
        if quantity <= 0 {
            return OrderOutcome::Rejected(OrderRejection::NonPositiveQuantity);
        }
        let Ok(id) = item_id.trim().parse::<i64>() else {
            return OrderOutcome::Rejected(OrderRejection::InvalidItemId);
        };

        let Some(current) = session.with(|s| s.snapshot.find_by_id(id).map(|item| item.quantity))
        else {
            return OrderOutcome::Rejected(OrderRejection::UnknownItem);
        };
        let Some(new_quantity) = current.checked_add(quantity) else {
            return OrderOutcome::Rejected(OrderRejection::QuantityOverflow);
        };

        let patch = QuantityPatch {
            quantity: new_quantity,
        };
        if let Err(e) = self.store.update(&self.table, id, &patch).await {
            debug!("Order update for item {} failed: {}", id, e);
            return OrderOutcome::UpdateFailed(e);
        }

        info!(
            "Ordered {} of item {} (now {})",
            quantity, id, new_quantity
        );
        session.with(|s| {
            s.form.order_item_id.clear();
            s.form.order_quantity = 0;
        });

        OrderOutcome::Ordered {
            id,
            new_quantity,
            refresh: self.fetch_inventory(session).await,
        }
    }
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
