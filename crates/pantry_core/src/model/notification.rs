//! Derived inventory notifications.

use crate::model::item::ItemId;
use serde::Serialize;

/// Why an item is being flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Expires within the alert window, or already expired.
    Expiring,
    /// Quantity below the low-stock threshold.
    LowStock,
}

/// One alert entry. Recomputed from the cache, never stored or mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub kind: NotificationKind,
    pub item_id: ItemId,
    pub item_name: String,
    /// Formatted expiration date for `Expiring`, formatted quantity for `LowStock`.
    pub detail: String,
}

impl Notification {
    /// User-facing sentence for notification panels.
    pub fn message(&self) -> String {
        match self.kind {
            NotificationKind::Expiring => {
                format!("Item {} expires on {}.", self.item_name, self.detail)
            }
            NotificationKind::LowStock => {
                format!("Item {} is running low ({} left).", self.item_name, self.detail)
            }
        }
    }
}
