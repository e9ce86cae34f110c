mod common;

use chrono::{TimeZone, Utc};
use common::{date, draft, owner, FlakyStore};
use pantry_core::db::open_db_in_memory;
use pantry_core::{
    Category, EditorMode, ItemFilter, ItemStore, NotificationKind, PantryConfig, PantrySession,
    RequiredField, SessionAction, SessionError, SqliteItemStore, StoreError, ValidationError,
};
use std::time::{Duration, Instant};

fn started_session<S: ItemStore>(store: S) -> PantrySession<S> {
    let mut session = PantrySession::new(store, Some(owner("alice")), PantryConfig::default());
    session.start().expect("initial refresh should succeed");
    session
}

#[test]
fn add_item_roundtrip_assigns_id_timestamp_and_placeholder_notes() {
    let conn = open_db_in_memory().unwrap();
    let mut session = started_session(SqliteItemStore::new(&conn));
    let before = Utc::now();

    let input = draft("basmati rice", Category::Grains, 3.0);
    let confirmation = session.add_item(input.clone()).unwrap();
    assert_eq!(confirmation.action, SessionAction::Add);
    assert_eq!(confirmation.message(), "Item added successfully!");

    let items = session.cache().items();
    assert_eq!(items.len(), 1);
    let stored = &items[0];
    assert_eq!(stored.id, confirmation.item_id);
    assert_eq!(stored.name, input.name);
    assert_eq!(Some(stored.category), input.category);
    assert_eq!(Some(stored.quantity), input.quantity);
    assert_eq!(Some(stored.unit), input.unit);
    assert_eq!(stored.expiration_date, input.expiration_date);
    assert_eq!(Some(stored.location), input.location);
    assert_eq!(stored.notes, "N/A");
    assert!(stored.last_updated >= before);

    assert_eq!(session.editor().mode(), EditorMode::Closed);
    assert_eq!(session.last_confirmation(), Some(&confirmation));
    assert!(session.last_error().is_none());
}

#[test]
fn last_updated_is_never_earlier_than_submission() {
    let conn = open_db_in_memory().unwrap();
    let mut session = started_session(SqliteItemStore::new(&conn));

    for round in 0..50 {
        let before = Utc::now();
        let id = session
            .add_item(draft(&format!("jar {round}"), Category::Condiments, 9.0))
            .unwrap()
            .item_id;
        let stamp = session.cache().get(id).unwrap().last_updated;
        assert!(stamp >= before, "stamp {stamp} precedes submission {before}");
    }
}

#[test]
fn missing_name_fails_validation_without_store_call() {
    let conn = open_db_in_memory().unwrap();
    let mut session = started_session(FlakyStore::new(SqliteItemStore::new(&conn)));

    let mut input = draft("", Category::Dairy, 1.0);
    input.name = "  ".to_string();
    let err = session.add_item(input).unwrap_err();

    assert!(matches!(
        err,
        SessionError::Validation(ValidationError::MissingField(RequiredField::Name))
    ));
    assert!(err.to_string().contains("name"));
    assert_eq!(session.store().writes.get(), 0);
    assert_eq!(session.editor().mode(), EditorMode::Create);
    assert!(matches!(
        session.last_error(),
        Some(SessionError::Validation(_))
    ));
}

#[test]
fn edit_rewrites_fields_and_refreshes_timestamp() {
    let conn = open_db_in_memory().unwrap();
    let mut session = started_session(SqliteItemStore::new(&conn));
    let id = session
        .add_item(draft("yogurt", Category::Dairy, 6.0))
        .unwrap()
        .item_id;
    let first_stamp = session.cache().get(id).unwrap().last_updated;

    session.begin_edit(id).unwrap();
    assert_eq!(session.editor().mode(), EditorMode::Edit(id));
    assert_eq!(session.editor().draft().name, "yogurt");
    assert_eq!(session.editor().draft().notes, "N/A");

    session.draft_mut().quantity = Some(2.0);
    session.draft_mut().notes = "greek".to_string();
    let confirmation = session.submit().unwrap();
    assert_eq!(confirmation.action, SessionAction::Update);

    let item = session.cache().get(id).unwrap();
    assert_eq!(item.quantity, 2.0);
    assert_eq!(item.notes, "greek");
    assert!(item.last_updated >= first_stamp);
    assert_eq!(session.cache().len(), 1);
}

#[test]
fn remove_item_drops_it_from_cache() {
    let conn = open_db_in_memory().unwrap();
    let mut session = started_session(SqliteItemStore::new(&conn));
    let keep = session
        .add_item(draft("pasta", Category::Grains, 9.0))
        .unwrap()
        .item_id;
    let gone = session
        .add_item(draft("ketchup", Category::Condiments, 1.0))
        .unwrap()
        .item_id;

    session.begin_edit(gone).unwrap();
    let confirmation = session.remove_item(gone).unwrap();
    assert_eq!(confirmation.message(), "Item deleted successfully!");

    assert!(session.cache().get(gone).is_none());
    assert!(session.cache().get(keep).is_some());
    assert_eq!(session.editor().mode(), EditorMode::Closed);
    assert!(session
        .notifications()
        .iter()
        .all(|notification| notification.item_id != gone));
}

#[test]
fn store_failure_on_submit_keeps_draft_mode_and_cache() {
    let conn = open_db_in_memory().unwrap();
    let mut session = started_session(FlakyStore::new(SqliteItemStore::new(&conn)));
    session.add_item(draft("tea", Category::Beverages, 8.0)).unwrap();

    session.store().fail_writes.set(true);
    let err = session.add_item(draft("coffee", Category::Beverages, 2.0)).unwrap_err();
    assert!(err.is_store_error());
    assert!(err.to_string().starts_with("failed to add item"));
    assert_eq!(session.editor().mode(), EditorMode::Create);
    assert_eq!(session.editor().draft().name, "coffee");
    assert_eq!(session.cache().len(), 1);

    session.store().fail_writes.set(false);
    let confirmation = session.submit().unwrap();
    assert_eq!(confirmation.action, SessionAction::Add);
    assert_eq!(session.cache().len(), 2);
}

#[test]
fn refresh_failure_keeps_previous_snapshot() {
    let conn = open_db_in_memory().unwrap();
    let mut session = started_session(FlakyStore::new(SqliteItemStore::new(&conn)));
    session.add_item(draft("soup", Category::CannedGoods, 2.0)).unwrap();
    let notifications_before = session.notifications().to_vec();

    session.store().fail_reads.set(true);
    let err = session.refresh().unwrap_err();
    assert!(matches!(
        err,
        SessionError::Store {
            action: SessionAction::Refresh,
            ..
        }
    ));
    assert_eq!(session.cache().len(), 1);
    assert_eq!(session.notifications(), notifications_before.as_slice());
}

#[test]
fn mutation_is_confirmed_even_when_follow_up_refresh_fails() {
    let conn = open_db_in_memory().unwrap();
    let mut session = started_session(FlakyStore::new(SqliteItemStore::new(&conn)));

    session.store().fail_reads.set(true);
    let confirmation = session.add_item(draft("lentils", Category::Grains, 5.0)).unwrap();
    assert_eq!(confirmation.action, SessionAction::Add);
    assert_eq!(session.editor().mode(), EditorMode::Closed);
    assert!(session.cache().is_empty());
    assert!(matches!(
        session.last_error(),
        Some(SessionError::Store {
            action: SessionAction::Refresh,
            ..
        })
    ));

    session.store().fail_reads.set(false);
    session.refresh().unwrap();
    assert_eq!(session.cache().len(), 1);
}

#[test]
fn update_of_missing_item_is_a_store_not_found() {
    let conn = open_db_in_memory().unwrap();
    let mut session = started_session(FlakyStore::new(SqliteItemStore::new(&conn)));
    session.add_item(draft("flour", Category::Grains, 7.0)).unwrap();
    let missing = uuid::Uuid::new_v4();

    let err = session
        .update_item(missing, draft("ghost", Category::Other, 1.0))
        .unwrap_err();
    assert!(matches!(
        &err,
        SessionError::Store { action: SessionAction::Update, source }
            if matches!(&**source, StoreError::NotFound(id) if *id == missing)
    ));
    assert!(err.to_string().starts_with("failed to update item"));
    assert_eq!(session.store().writes.get(), 2);
    assert_eq!(session.editor().mode(), EditorMode::Edit(missing));
    assert_eq!(session.cache().len(), 1);
}

#[test]
fn begin_edit_of_uncached_item_is_rejected_locally() {
    let conn = open_db_in_memory().unwrap();
    let mut session = started_session(FlakyStore::new(SqliteItemStore::new(&conn)));
    let missing = uuid::Uuid::new_v4();

    let err = session.begin_edit(missing).unwrap_err();
    assert!(matches!(err, SessionError::UnknownItem(id) if id == missing));
    assert_eq!(session.store().writes.get(), 0);
    assert_eq!(session.editor().mode(), EditorMode::Closed);
}

#[test]
fn submit_with_closed_editor_is_an_error() {
    let conn = open_db_in_memory().unwrap();
    let mut session = started_session(SqliteItemStore::new(&conn));
    assert!(matches!(session.submit(), Err(SessionError::EditorClosed)));
}

#[test]
fn notifications_follow_the_cache() {
    let conn = open_db_in_memory().unwrap();
    let mut session = started_session(SqliteItemStore::new(&conn));

    let mut milk = draft("milk", Category::Dairy, 1.0);
    milk.expiration_date = Some(date(2026, 10, 21));
    session.add_item(milk).unwrap();
    session.add_item(draft("beans", Category::CannedGoods, 12.0)).unwrap();

    let now = Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap();
    session.refresh_alerts(now);
    let kinds: Vec<(&str, NotificationKind)> = session
        .notifications()
        .iter()
        .map(|notification| (notification.item_name.as_str(), notification.kind))
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("milk", NotificationKind::Expiring),
            ("milk", NotificationKind::LowStock),
        ]
    );
}

#[test]
fn filters_and_debounced_search_narrow_visible_items() {
    let conn = open_db_in_memory().unwrap();
    let mut session = started_session(SqliteItemStore::new(&conn));
    for (name, category, quantity) in [
        ("cheddar", Category::Dairy, 2.0),
        ("butter", Category::Dairy, 7.0),
        ("chickpeas", Category::CannedGoods, 10.0),
    ] {
        session.add_item(draft(name, category, quantity)).unwrap();
    }
    assert_eq!(session.visible_items().len(), 3);

    session.set_filter(ItemFilter {
        category: Some(Category::Dairy),
        ..ItemFilter::default()
    });
    assert_eq!(session.visible_items().len(), 2);

    let start = Instant::now();
    session.type_search_text("c", start);
    session.type_search_text("ch", start + Duration::from_millis(120));
    assert!(!session.settle_search(start + Duration::from_millis(200)));
    assert_eq!(session.search_text(), "");

    assert!(session.settle_search(start + Duration::from_millis(420)));
    assert_eq!(session.search_text(), "ch");
    let names: Vec<&str> = session
        .visible_items()
        .iter()
        .map(|item| item.name.as_str())
        .collect();
    assert_eq!(names, vec!["cheddar"]);

    session.set_filter(ItemFilter::default());
    session.set_search_text("");
    assert_eq!(session.visible_items().len(), 3);
}

#[test]
fn switching_owner_reloads_scoped_items() {
    let conn = open_db_in_memory().unwrap();
    let mut session = started_session(SqliteItemStore::new(&conn));
    session.add_item(draft("granola", Category::Snacks, 4.0)).unwrap();

    session.switch_owner(Some(owner("bob"))).unwrap();
    assert!(session.cache().is_empty());
    assert!(session.notifications().is_empty());

    session.add_item(draft("soda", Category::Beverages, 12.0)).unwrap();
    session.switch_owner(Some(owner("alice"))).unwrap();
    let names: Vec<&str> = session
        .cache()
        .items()
        .iter()
        .map(|item| item.name.as_str())
        .collect();
    assert_eq!(names, vec!["granola"]);
}
