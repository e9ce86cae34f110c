//! Filter and search over cached items.
//!
//! # Invariants
//! - Output preserves input order; nothing is re-sorted.
//! - All active criteria combine with logical AND.

use crate::model::item::{Category, Item};
use chrono::NaiveDate;

/// Optional narrowing criteria set from the filter controls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemFilter {
    /// Exact category match.
    pub category: Option<Category>,
    /// Keep items expiring on or before this date. Items without a date are dropped.
    pub expires_on_or_before: Option<NaiveDate>,
    /// Keep items with at least this quantity.
    pub min_quantity: Option<f64>,
}

impl ItemFilter {
    /// Whether no criterion is set.
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.expires_on_or_before.is_none()
            && self.min_quantity.is_none()
    }

    /// Returns whether `item` satisfies every active criterion.
    pub fn matches(&self, item: &Item) -> bool {
        if let Some(category) = self.category {
            if item.category != category {
                return false;
            }
        }

        if let Some(cutoff) = self.expires_on_or_before {
            match item.expiration_date {
                Some(date) if date <= cutoff => {}
                _ => return false,
            }
        }

        if let Some(min_quantity) = self.min_quantity {
            if item.quantity < min_quantity {
                return false;
            }
        }

        true
    }
}

/// Case-insensitive substring match against name or category label.
///
/// Blank search text matches everything.
pub fn matches_search(item: &Item, search_text: &str) -> bool {
    matches_folded(item, &search_text.trim().to_lowercase())
}

fn matches_folded(item: &Item, needle: &str) -> bool {
    needle.is_empty()
        || item.name.to_lowercase().contains(needle)
        || item.category.label().to_lowercase().contains(needle)
}

/// Derives the visible subset of `items`, preserving order.
pub fn visible<'a>(items: &'a [Item], filter: &ItemFilter, search_text: &str) -> Vec<&'a Item> {
    let needle = search_text.trim().to_lowercase();
    items
        .iter()
        .filter(|item| filter.matches(item))
        .filter(|item| matches_folded(item, &needle))
        .collect()
}
