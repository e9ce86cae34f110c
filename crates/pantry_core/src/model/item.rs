//! Pantry item domain model.
//!
//! # Responsibility
//! - Define the canonical item record and its fixed vocabularies.
//! - Define the editable working item (`ItemDraft`) and its validation.
//!
//! # Invariants
//! - `id` is assigned by the store and never reused for another item.
//! - `quantity` is finite and never negative.
//! - `name` is never blank once persisted.
//! - `last_updated` is set by the editor workflow, never by user input.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier of a stored item.
pub type ItemId = Uuid;

/// Sentinel written into `notes` when the user leaves them blank.
pub const NOTES_PLACEHOLDER: &str = "N/A";

/// Error returned when parsing one of the fixed item vocabularies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownValue {
    pub vocabulary: &'static str,
    pub value: String,
}

impl Display for UnknownValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown {}: `{}`", self.vocabulary, self.value)
    }
}

impl Error for UnknownValue {}

macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident, $label:literal {
            $($variant:ident => $display:literal $(| $alias:literal)*),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// All values in display order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Human-readable label.
            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $display),+
                }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = UnknownValue;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                let wanted = normalize_token(value);
                $(
                    if normalize_token($display) == wanted
                        $(|| normalize_token($alias) == wanted)*
                    {
                        return Ok($name::$variant);
                    }
                )+
                Err(UnknownValue {
                    vocabulary: $label,
                    value: value.trim().to_string(),
                })
            }
        }
    };
}

vocabulary! {
    /// Pantry category of an item.
    Category, "category" {
        Grains => "Grains",
        CannedGoods => "Canned Goods" | "canned_goods",
        Dairy => "Dairy",
        Produce => "Produce",
        Meat => "Meat",
        FrozenFoods => "Frozen Foods" | "frozen_foods",
        Beverages => "Beverages",
        Snacks => "Snacks",
        Condiments => "Condiments",
        Other => "Other",
    }
}

vocabulary! {
    /// Unit of measurement. Labels are the short codes shown next to quantities.
    Unit, "unit" {
        Pounds => "lbs" | "pounds",
        Ounces => "oz" | "ounces",
        Kilograms => "kg" | "kilograms",
        Grams => "g" | "grams",
        Gallons => "gal" | "gallons",
        Quarts => "qt" | "quarts",
        Pints => "pt" | "pints",
        Cups => "c" | "cups",
        FluidOunces => "fl oz" | "fluid_ounces" | "fluid ounces",
        Milliliters => "ml" | "milliliters",
        Liters => "l" | "liters",
        Pieces => "pcs" | "pieces",
        Cans => "cans",
        Bottles => "bottles",
        Jars => "jars",
        Boxes => "boxes",
        Packs => "packs",
        Tablespoons => "tbsp" | "tablespoons",
        Teaspoons => "tsp" | "teaspoons",
        Bags => "bags",
        Slices => "slices",
        Bars => "bars",
    }
}

vocabulary! {
    /// Storage spot inside the pantry.
    Location, "location" {
        TopShelf => "Top Shelf" | "top_shelf",
        MiddleShelf => "Middle Shelf" | "middle_shelf",
        BottomShelf => "Bottom Shelf" | "bottom_shelf",
        LeftSide => "Left Side" | "left_side",
        RightSide => "Right Side" | "right_side",
        Front => "Front",
        Back => "Back",
        PantryDoor => "Pantry Door" | "pantry_door",
        Cabinet => "Cabinet",
        Drawer => "Drawer",
    }
}

fn normalize_token(value: &str) -> String {
    value.trim().to_ascii_lowercase()
}

/// Field invariant violations detected on a complete record.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemValidationError {
    BlankName,
    InvalidQuantity(f64),
}

impl Display for ItemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "item name cannot be blank"),
            Self::InvalidQuantity(value) => {
                write!(f, "item quantity must be a non-negative number, got {value}")
            }
        }
    }
}

impl Error for ItemValidationError {}

/// Item payload without identity, as written to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemFields {
    pub name: String,
    pub category: Category,
    pub quantity: f64,
    pub unit: Unit,
    pub expiration_date: Option<NaiveDate>,
    pub location: Location,
    pub notes: String,
    pub last_updated: DateTime<Utc>,
}

impl ItemFields {
    /// Checks record-level invariants that every write path must hold.
    pub fn validate(&self) -> Result<(), ItemValidationError> {
        if self.name.trim().is_empty() {
            return Err(ItemValidationError::BlankName);
        }
        if !is_valid_quantity(self.quantity) {
            return Err(ItemValidationError::InvalidQuantity(self.quantity));
        }
        Ok(())
    }
}

/// Canonical stored pantry item. Serializes as the camelCase JSON document
/// emitted by `pantry list --json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub category: Category,
    pub quantity: f64,
    pub unit: Unit,
    pub expiration_date: Option<NaiveDate>,
    pub location: Location,
    pub notes: String,
    pub last_updated: DateTime<Utc>,
}

impl Item {
    /// Joins a store-assigned id with its stored fields.
    pub fn from_fields(id: ItemId, fields: ItemFields) -> Self {
        Self {
            id,
            name: fields.name,
            category: fields.category,
            quantity: fields.quantity,
            unit: fields.unit,
            expiration_date: fields.expiration_date,
            location: fields.location,
            notes: fields.notes,
            last_updated: fields.last_updated,
        }
    }

    /// Returns the identity-free payload of this item.
    pub fn to_fields(&self) -> ItemFields {
        ItemFields {
            name: self.name.clone(),
            category: self.category,
            quantity: self.quantity,
            unit: self.unit,
            expiration_date: self.expiration_date,
            location: self.location,
            notes: self.notes.clone(),
            last_updated: self.last_updated,
        }
    }

    /// Name with its first character upper-cased, for list display.
    pub fn display_name(&self) -> String {
        let mut chars = self.name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

/// Formats a calendar date as `YYYY/MM/DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y/%m/%d").to_string()
}

/// Formats a quantity without a trailing `.0` for whole numbers.
pub fn format_quantity(quantity: f64) -> String {
    if quantity.fract() == 0.0 && quantity.abs() < 1e15 {
        format!("{quantity:.0}")
    } else {
        quantity.to_string()
    }
}

fn is_valid_quantity(quantity: f64) -> bool {
    quantity.is_finite() && quantity >= 0.0
}

/// Fields the editor requires before anything is sent to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Name,
    Category,
    Quantity,
    Unit,
    ExpirationDate,
    Location,
}

impl RequiredField {
    /// Validation order.
    pub const ALL: [RequiredField; 6] = [
        Self::Name,
        Self::Category,
        Self::Quantity,
        Self::Unit,
        Self::ExpirationDate,
        Self::Location,
    ];

    /// Field key as used in serialized items.
    pub fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Category => "category",
            Self::Quantity => "quantity",
            Self::Unit => "unit",
            Self::ExpirationDate => "expirationDate",
            Self::Location => "location",
        }
    }

    /// Lower-case words for user-facing messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Category => "category",
            Self::Quantity => "quantity",
            Self::Unit => "unit",
            Self::ExpirationDate => "expiration date",
            Self::Location => "location",
        }
    }
}

/// Local validation failure of a working item. Never reaches the store.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    MissingField(RequiredField),
    InvalidQuantity(f64),
}

impl ValidationError {
    /// The offending field.
    pub fn field(&self) -> RequiredField {
        match self {
            Self::MissingField(field) => *field,
            Self::InvalidQuantity(_) => RequiredField::Quantity,
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "please fill in the {}", field.label()),
            Self::InvalidQuantity(value) => {
                write!(f, "quantity must be a non-negative number, got {value}")
            }
        }
    }
}

impl Error for ValidationError {}

/// Working item edited in the create/edit workflow.
///
/// Every required field may be absent while the user is still typing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemDraft {
    pub name: String,
    pub category: Option<Category>,
    pub quantity: Option<f64>,
    pub unit: Option<Unit>,
    pub expiration_date: Option<NaiveDate>,
    pub location: Option<Location>,
    pub notes: String,
    /// Read-only echo of the loaded item's timestamp.
    pub last_updated: Option<DateTime<Utc>>,
}

impl ItemDraft {
    /// Loads a draft from an existing item (edit mode).
    pub fn from_item(item: &Item) -> Self {
        Self {
            name: item.name.clone(),
            category: Some(item.category),
            quantity: Some(item.quantity),
            unit: Some(item.unit),
            expiration_date: item.expiration_date,
            location: Some(item.location),
            notes: item.notes.clone(),
            last_updated: Some(item.last_updated),
        }
    }

    /// Checks required fields in order and reports the first one missing.
    ///
    /// A quantity of `0` counts as present.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for field in RequiredField::ALL {
            let present = match field {
                RequiredField::Name => !self.name.trim().is_empty(),
                RequiredField::Category => self.category.is_some(),
                RequiredField::Quantity => self.quantity.is_some(),
                RequiredField::Unit => self.unit.is_some(),
                RequiredField::ExpirationDate => self.expiration_date.is_some(),
                RequiredField::Location => self.location.is_some(),
            };
            if !present {
                return Err(ValidationError::MissingField(field));
            }
        }

        if let Some(quantity) = self.quantity {
            if !is_valid_quantity(quantity) {
                return Err(ValidationError::InvalidQuantity(quantity));
            }
        }
        Ok(())
    }

    /// Validates and converts into a store payload.
    ///
    /// Blank notes become `placeholder`; `last_updated` is set to `now`.
    pub fn into_fields(
        self,
        now: DateTime<Utc>,
        placeholder: &str,
    ) -> Result<ItemFields, ValidationError> {
        self.validate()?;
        let missing = |field| ValidationError::MissingField(field);
        let notes = if self.notes.trim().is_empty() {
            placeholder.to_string()
        } else {
            self.notes
        };

        Ok(ItemFields {
            name: self.name,
            category: self.category.ok_or(missing(RequiredField::Category))?,
            quantity: self.quantity.ok_or(missing(RequiredField::Quantity))?,
            unit: self.unit.ok_or(missing(RequiredField::Unit))?,
            expiration_date: self.expiration_date,
            location: self.location.ok_or(missing(RequiredField::Location))?,
            notes,
            last_updated: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{
        format_date, format_quantity, Category, Item, ItemDraft, Location, RequiredField, Unit,
        ValidationError,
    };
    use chrono::{NaiveDate, TimeZone, Utc};

    fn complete_draft() -> ItemDraft {
        ItemDraft {
            name: "rice".to_string(),
            category: Some(Category::Grains),
            quantity: Some(2.0),
            unit: Some(Unit::Kilograms),
            expiration_date: NaiveDate::from_ymd_opt(2027, 1, 5),
            location: Some(Location::TopShelf),
            notes: String::new(),
            last_updated: None,
        }
    }

    #[test]
    fn vocabularies_parse_labels_and_serialized_names() {
        assert_eq!("canned goods".parse::<Category>(), Ok(Category::CannedGoods));
        assert_eq!("canned_goods".parse::<Category>(), Ok(Category::CannedGoods));
        assert_eq!(" DAIRY ".parse::<Category>(), Ok(Category::Dairy));
        assert_eq!("fl oz".parse::<Unit>(), Ok(Unit::FluidOunces));
        assert_eq!("kilograms".parse::<Unit>(), Ok(Unit::Kilograms));
        assert_eq!("pantry door".parse::<Location>(), Ok(Location::PantryDoor));

        let err = "attic".parse::<Location>().unwrap_err();
        assert_eq!(err.vocabulary, "location");
        assert_eq!(err.to_string(), "unknown location: `attic`");
    }

    #[test]
    fn every_label_round_trips_through_from_str() {
        for category in Category::ALL {
            assert_eq!(category.label().parse::<Category>(), Ok(*category));
        }
        for unit in Unit::ALL {
            assert_eq!(unit.label().parse::<Unit>(), Ok(*unit));
        }
        for location in Location::ALL {
            assert_eq!(location.label().parse::<Location>(), Ok(*location));
        }
    }

    #[test]
    fn validate_reports_first_missing_field_in_order() {
        let mut draft = ItemDraft::default();
        assert_eq!(
            draft.validate(),
            Err(ValidationError::MissingField(RequiredField::Name))
        );

        draft.name = "beans".to_string();
        draft.unit = Some(Unit::Cans);
        assert_eq!(
            draft.validate(),
            Err(ValidationError::MissingField(RequiredField::Category))
        );

        let mut draft = complete_draft();
        draft.expiration_date = None;
        draft.location = None;
        let err = draft.validate().unwrap_err();
        assert_eq!(err.field(), RequiredField::ExpirationDate);
        assert_eq!(err.to_string(), "please fill in the expiration date");
    }

    #[test]
    fn zero_quantity_is_present_but_negative_is_rejected() {
        let mut draft = complete_draft();
        draft.quantity = Some(0.0);
        assert!(draft.validate().is_ok());

        draft.quantity = Some(-1.0);
        assert_eq!(draft.validate(), Err(ValidationError::InvalidQuantity(-1.0)));

        draft.quantity = Some(f64::NAN);
        assert!(matches!(
            draft.validate(),
            Err(ValidationError::InvalidQuantity(_))
        ));
    }

    #[test]
    fn into_fields_fills_placeholder_and_timestamp() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let mut draft = complete_draft();
        draft.notes = "   ".to_string();

        let fields = draft.into_fields(now, "N/A").unwrap();
        assert_eq!(fields.notes, "N/A");
        assert_eq!(fields.last_updated, now);
        assert_eq!(fields.name, "rice");

        let mut draft = complete_draft();
        draft.notes = "top left corner".to_string();
        let fields = draft.into_fields(now, "N/A").unwrap();
        assert_eq!(fields.notes, "top left corner");
    }

    #[test]
    fn item_serializes_as_camel_case_document() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let fields = complete_draft().into_fields(now, "N/A").unwrap();
        let item = Item::from_fields(uuid::Uuid::nil(), fields);

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["id"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(json["category"], "grains");
        assert_eq!(json["unit"], "kilograms");
        assert_eq!(json["expirationDate"], item.expiration_date.unwrap().to_string());
        assert_eq!(json["lastUpdated"], "2026-10-19T12:00:00Z");
        assert!(json.get("last_updated").is_none());
    }

    #[test]
    fn display_helpers_match_list_format() {
        assert_eq!(
            format_date(NaiveDate::from_ymd_opt(2026, 3, 7).unwrap()),
            "2026/03/07"
        );
        assert_eq!(format_quantity(3.0), "3");
        assert_eq!(format_quantity(1.5), "1.5");
    }
}
