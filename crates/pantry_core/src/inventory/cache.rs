//! Wholesale-refreshed item cache.

use crate::model::item::{Item, ItemId};
use crate::store::{ItemStore, OwnerId, StoreResult};
use chrono::{DateTime, Utc};
use log::{info, warn};
use std::time::Instant;

/// Last known-good snapshot of the store, in store iteration order.
#[derive(Debug, Clone, Default)]
pub struct InventoryCache {
    items: Vec<Item>,
    refreshed_at: Option<DateTime<Utc>>,
}

impl InventoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-fetches every item visible to `owner` and swaps the snapshot in.
    ///
    /// On error the previous snapshot is kept and the error is returned.
    pub fn refresh<S: ItemStore + ?Sized>(
        &mut self,
        store: &S,
        owner: Option<&OwnerId>,
    ) -> StoreResult<()> {
        let started_at = Instant::now();
        match store.list_items(owner) {
            Ok(items) => {
                info!(
                    "event=cache_refresh module=inventory status=ok count={} duration_ms={}",
                    items.len(),
                    started_at.elapsed().as_millis()
                );
                self.items = items;
                self.refreshed_at = Some(Utc::now());
                Ok(())
            }
            Err(err) => {
                warn!(
                    "event=cache_refresh module=inventory status=error kept={} error={}",
                    self.items.len(),
                    err
                );
                Err(err)
            }
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Time of the last successful refresh, `None` before the first one.
    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }

    /// Drops the snapshot, e.g. when the signed-in owner changes.
    pub fn clear(&mut self) {
        self.items.clear();
        self.refreshed_at = None;
    }
}
