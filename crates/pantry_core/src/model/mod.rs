//! Pantry domain model.
//!
//! # Responsibility
//! - Define canonical data structures used by the inventory workflow.
//! - Keep stored records (`Item`) apart from editable form state (`ItemDraft`)
//!   and derived views (`Notification`).
//!
//! # Invariants
//! - Every stored item is identified by a stable `ItemId`.
//! - Notifications are derived on demand and never persisted.

pub mod item;
pub mod notification;
