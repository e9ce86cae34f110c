//! Core inventory logic for the pantry tracker.
//! This crate owns item invariants, the cache/refresh workflow and every
//! derived view (visible items, notifications).

pub mod alerts;
pub mod config;
pub mod db;
pub mod inventory;
pub mod logging;
pub mod model;
pub mod search;
pub mod service;
pub mod store;

pub use alerts::{days_until, derive_alerts, AlertPolicy};
pub use config::{ConfigError, PantryConfig};
pub use inventory::cache::InventoryCache;
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};
pub use model::item::{
    format_date, format_quantity, Category, Item, ItemDraft, ItemFields, ItemId, Location,
    RequiredField, Unit, ValidationError, NOTES_PLACEHOLDER,
};
pub use model::notification::{Notification, NotificationKind};
pub use search::debounce::Debouncer;
pub use search::filter::{visible, ItemFilter};
pub use service::editor::{EditorMode, ItemEditor, PreparedSubmission};
pub use service::session::{Confirmation, PantrySession, SessionAction, SessionError};
pub use store::{ItemStore, OwnerId, SqliteItemStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
