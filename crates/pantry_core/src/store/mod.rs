//! Item store contract and bundled adapters.
//!
//! # Responsibility
//! - Define the CRUD boundary to the document store holding pantry items.
//! - Scope every operation to the authenticated owner when one is present.
//!
//! # Invariants
//! - Writes validate `ItemFields` before touching storage.
//! - `list_items` returns items in insertion order.
//! - Update/delete of a missing (or foreign-owned) id is `NotFound`.

pub mod sqlite;

use crate::db::DbError;
use crate::model::item::{Item, ItemFields, ItemId, ItemValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use sqlite::SqliteItemStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Opaque authenticated-user handle supplied by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwnerId(String);

impl OwnerId {
    /// Wraps a provider handle. Returns `None` for blank handles.
    pub fn new(handle: impl Into<String>) -> Option<Self> {
        let handle = handle.into();
        let trimmed = handle.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for OwnerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Failure of a create/read/update/delete call against the store.
#[derive(Debug)]
pub enum StoreError {
    Validation(ItemValidationError),
    Db(DbError),
    NotFound(ItemId),
    InvalidData(String),
    /// Transport or permission failure reported by a remote adapter.
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "item not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid stored item data: {message}"),
            Self::Unavailable(message) => write!(f, "item store unavailable: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) | Self::Unavailable(_) => None,
        }
    }
}

impl From<ItemValidationError> for StoreError {
    fn from(value: ItemValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// CRUD contract for the item collection.
pub trait ItemStore {
    /// Creates one document and returns its newly assigned id.
    fn create_item(&self, owner: Option<&OwnerId>, fields: &ItemFields) -> StoreResult<ItemId>;
    /// Returns every item visible to `owner` (all items when `None`).
    fn list_items(&self, owner: Option<&OwnerId>) -> StoreResult<Vec<Item>>;
    /// Replaces all fields of an existing item.
    fn update_item(
        &self,
        owner: Option<&OwnerId>,
        id: ItemId,
        fields: &ItemFields,
    ) -> StoreResult<()>;
    /// Removes an item permanently.
    fn delete_item(&self, owner: Option<&OwnerId>, id: ItemId) -> StoreResult<()>;
}
