#![allow(dead_code)]

use chrono::{NaiveDate, TimeZone, Utc};
use pantry_core::{
    Category, Item, ItemDraft, ItemFields, ItemId, ItemStore, Location, OwnerId, StoreError,
    StoreResult, Unit,
};
use std::cell::Cell;

pub fn owner(handle: &str) -> OwnerId {
    OwnerId::new(handle).expect("test owner handle should be valid")
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("test date should be valid")
}

pub fn fields(name: &str, category: Category, quantity: f64) -> ItemFields {
    ItemFields {
        name: name.to_string(),
        category,
        quantity,
        unit: Unit::Pieces,
        expiration_date: Some(date(2027, 1, 1)),
        location: Location::Cabinet,
        notes: "N/A".to_string(),
        last_updated: Utc.with_ymd_and_hms(2026, 10, 1, 12, 0, 0).unwrap(),
    }
}

pub fn draft(name: &str, category: Category, quantity: f64) -> ItemDraft {
    ItemDraft {
        name: name.to_string(),
        category: Some(category),
        quantity: Some(quantity),
        unit: Some(Unit::Pieces),
        expiration_date: Some(date(2027, 1, 1)),
        location: Some(Location::Cabinet),
        notes: String::new(),
        last_updated: None,
    }
}

/// Store wrapper that counts calls and can be told to fail.
pub struct FlakyStore<S> {
    inner: S,
    pub fail_writes: Cell<bool>,
    pub fail_reads: Cell<bool>,
    pub writes: Cell<usize>,
    pub reads: Cell<usize>,
}

impl<S: ItemStore> FlakyStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            fail_writes: Cell::new(false),
            fail_reads: Cell::new(false),
            writes: Cell::new(0),
            reads: Cell::new(0),
        }
    }

    fn write<T>(&self, call: impl FnOnce(&S) -> StoreResult<T>) -> StoreResult<T> {
        self.writes.set(self.writes.get() + 1);
        if self.fail_writes.get() {
            return Err(StoreError::Unavailable("permission denied".to_string()));
        }
        call(&self.inner)
    }
}

impl<S: ItemStore> ItemStore for FlakyStore<S> {
    fn create_item(&self, owner: Option<&OwnerId>, fields: &ItemFields) -> StoreResult<ItemId> {
        self.write(|inner| inner.create_item(owner, fields))
    }

    fn list_items(&self, owner: Option<&OwnerId>) -> StoreResult<Vec<Item>> {
        self.reads.set(self.reads.get() + 1);
        if self.fail_reads.get() {
            return Err(StoreError::Unavailable("network unreachable".to_string()));
        }
        self.inner.list_items(owner)
    }

    fn update_item(
        &self,
        owner: Option<&OwnerId>,
        id: ItemId,
        fields: &ItemFields,
    ) -> StoreResult<()> {
        self.write(|inner| inner.update_item(owner, id, fields))
    }

    fn delete_item(&self, owner: Option<&OwnerId>, id: ItemId) -> StoreResult<()> {
        self.write(|inner| inner.delete_item(owner, id))
    }
}
