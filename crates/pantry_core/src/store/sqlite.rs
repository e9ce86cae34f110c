//! SQLite-backed item store.
//!
//! # Invariants
//! - Ids are random v4 UUIDs generated on create and never reissued.
//! - Read paths reject invalid persisted rows instead of masking them.

use crate::model::item::{Category, Item, ItemFields, ItemId, Location, Unit};
use crate::store::{ItemStore, OwnerId, StoreError, StoreResult};
use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, warn};
use rusqlite::{params, Connection, Row};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

const ITEM_SELECT_SQL: &str = "SELECT
    id,
    name,
    category,
    quantity,
    unit,
    expiration_date,
    location,
    notes,
    last_updated
FROM items";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Item store over a migrated pantry connection (see [`crate::db::open_db`]).
pub struct SqliteItemStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteItemStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ItemStore for SqliteItemStore<'_> {
    fn create_item(&self, owner: Option<&OwnerId>, fields: &ItemFields) -> StoreResult<ItemId> {
        fields.validate()?;
        let id = Uuid::new_v4();

        self.conn.execute(
            "INSERT INTO items (
                id,
                owner_id,
                name,
                category,
                quantity,
                unit,
                expiration_date,
                location,
                notes,
                last_updated
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
            params![
                id.to_string(),
                owner.map(OwnerId::as_str),
                fields.name.as_str(),
                to_db_name(fields.category)?,
                fields.quantity,
                to_db_name(fields.unit)?,
                fields.expiration_date.map(date_to_db),
                to_db_name(fields.location)?,
                fields.notes.as_str(),
                fields.last_updated.timestamp_millis(),
            ],
        )?;

        debug!("event=store_create module=store status=ok");
        Ok(id)
    }

    fn list_items(&self, owner: Option<&OwnerId>) -> StoreResult<Vec<Item>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ITEM_SELECT_SQL}
             WHERE (?1 IS NULL OR owner_id = ?1)
             ORDER BY rowid ASC;"
        ))?;

        let mut rows = stmt.query(params![owner.map(OwnerId::as_str)])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }

        debug!(
            "event=store_list module=store status=ok count={}",
            items.len()
        );
        Ok(items)
    }

    fn update_item(
        &self,
        owner: Option<&OwnerId>,
        id: ItemId,
        fields: &ItemFields,
    ) -> StoreResult<()> {
        fields.validate()?;

        let changed = self.conn.execute(
            "UPDATE items
             SET
                name = ?1,
                category = ?2,
                quantity = ?3,
                unit = ?4,
                expiration_date = ?5,
                location = ?6,
                notes = ?7,
                last_updated = ?8
             WHERE id = ?9
               AND (?10 IS NULL OR owner_id = ?10);",
            params![
                fields.name.as_str(),
                to_db_name(fields.category)?,
                fields.quantity,
                to_db_name(fields.unit)?,
                fields.expiration_date.map(date_to_db),
                to_db_name(fields.location)?,
                fields.notes.as_str(),
                fields.last_updated.timestamp_millis(),
                id.to_string(),
                owner.map(OwnerId::as_str),
            ],
        )?;

        if changed == 0 {
            warn!("event=store_update module=store status=error error_code=not_found");
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    fn delete_item(&self, owner: Option<&OwnerId>, id: ItemId) -> StoreResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM items WHERE id = ?1 AND (?2 IS NULL OR owner_id = ?2);",
            params![id.to_string(), owner.map(OwnerId::as_str)],
        )?;

        if changed == 0 {
            warn!("event=store_delete module=store status=error error_code=not_found");
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}

fn parse_item_row(row: &Row<'_>) -> StoreResult<Item> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text)
        .map_err(|_| StoreError::InvalidData(format!("invalid id `{id_text}` in items.id")))?;

    let category: Category = from_db_name(row, "category")?;
    let unit: Unit = from_db_name(row, "unit")?;
    let location: Location = from_db_name(row, "location")?;

    let expiration_date = match row.get::<_, Option<String>>("expiration_date")? {
        Some(text) => Some(NaiveDate::parse_from_str(&text, DATE_FORMAT).map_err(|_| {
            StoreError::InvalidData(format!(
                "invalid date `{text}` in items.expiration_date"
            ))
        })?),
        None => None,
    };

    let millis: i64 = row.get("last_updated")?;
    let last_updated = DateTime::<Utc>::from_timestamp_millis(millis).ok_or_else(|| {
        StoreError::InvalidData(format!("invalid timestamp `{millis}` in items.last_updated"))
    })?;

    let fields = ItemFields {
        name: row.get("name")?,
        category,
        quantity: row.get("quantity")?,
        unit,
        expiration_date,
        location,
        notes: row.get("notes")?,
        last_updated,
    };
    fields.validate()?;
    Ok(Item::from_fields(id, fields))
}

fn date_to_db(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Vocabulary values are stored under their serde names (`canned_goods`).
fn to_db_name<T: Serialize>(value: T) -> StoreResult<String> {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(name)) => Ok(name),
        Ok(other) => Err(StoreError::InvalidData(format!(
            "vocabulary value serialized as non-string `{other}`"
        ))),
        Err(err) => Err(StoreError::InvalidData(err.to_string())),
    }
}

fn from_db_name<T: DeserializeOwned>(row: &Row<'_>, column: &str) -> StoreResult<T> {
    let text: String = row.get(column)?;
    serde_json::from_value(serde_json::Value::String(text.clone())).map_err(|_| {
        StoreError::InvalidData(format!("invalid value `{text}` in items.{column}"))
    })
}
