//! Expiring and low-stock alert derivation.
//!
//! # Invariants
//! - Alerts are recomputed from scratch on every call; nothing is tracked
//!   between calls.
//! - Output follows item order; per item the expiring alert precedes the
//!   low-stock alert.

use crate::model::item::{format_date, format_quantity, Item};
use crate::model::notification::{Notification, NotificationKind};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Thresholds for alert derivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AlertPolicy {
    /// Flag items whose rounded-up days until expiration is at most this.
    pub expiring_within_days: i64,
    /// Flag items whose quantity is strictly below this.
    pub low_stock_below: f64,
}

impl Default for AlertPolicy {
    fn default() -> Self {
        Self {
            expiring_within_days: 7,
            low_stock_below: 5.0,
        }
    }
}

/// Whole days from `now` until the start (UTC midnight) of `date`, rounded up.
///
/// Negative for dates already past.
pub fn days_until(date: NaiveDate, now: DateTime<Utc>) -> i64 {
    let expires_at = date.and_hms_opt(0, 0, 0).map(|midnight| midnight.and_utc());
    let Some(expires_at) = expires_at else {
        return 0;
    };

    let diff = expires_at.timestamp_millis() - now.timestamp_millis();
    // Integer division truncates toward zero, which is already the ceiling
    // for negative differences.
    let days = diff / MILLIS_PER_DAY;
    if diff % MILLIS_PER_DAY > 0 {
        days + 1
    } else {
        days
    }
}

/// Derives notifications for `items` as of `now`.
pub fn derive_alerts(items: &[Item], now: DateTime<Utc>, policy: &AlertPolicy) -> Vec<Notification> {
    let mut alerts = Vec::new();
    for item in items {
        if let Some(date) = item.expiration_date {
            if days_until(date, now) <= policy.expiring_within_days {
                alerts.push(Notification {
                    kind: NotificationKind::Expiring,
                    item_id: item.id,
                    item_name: item.name.clone(),
                    detail: format_date(date),
                });
            }
        }

        if item.quantity < policy.low_stock_below {
            alerts.push(Notification {
                kind: NotificationKind::LowStock,
                item_id: item.id,
                item_name: item.name.clone(),
                detail: format_quantity(item.quantity),
            });
        }
    }
    alerts
}
