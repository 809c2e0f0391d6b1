use pretty_assertions::assert_eq;
use tempfile::TempDir;

use rota::AppError;
use rota::database::init_store;
use rota::database::models::{Assignee, ShiftId};
use rota::database::store::{FileStore, KeyValueStore, Store};

mod common;
use common::{TestContext, date};

#[test]
fn test_file_store_basic_operations() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::open(dir.path()).unwrap();

    assert_eq!(store.get("userName").unwrap(), None);
    store.set("userName", "\"Ward 7\"").unwrap();
    store.set("staffSettings_A/B", "{}").unwrap();
    assert_eq!(store.get("userName").unwrap().as_deref(), Some("\"Ward 7\""));
    assert_eq!(store.keys().unwrap(), vec!["staffSettings_A/B", "userName"]);

    store.remove("userName").unwrap();
    store.remove("userName").unwrap();
    assert_eq!(store.get("userName").unwrap(), None);
}

#[test]
fn test_unknown_files_in_data_dir_are_ignored() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();
    std::fs::write(dir.path().join("!!!.json"), "{}").unwrap();
    let store = FileStore::open(dir.path()).unwrap();

    assert!(store.keys().unwrap().is_empty());
}

#[test]
fn test_state_survives_reopening() {
    // Arrange
    let ctx = TestContext::on_disk().with_standard_shifts().with_staff(&["Alice", "Bob/Ops"]);
    ctx.assign("Alice", date(2024, 3, 5), 2);
    ctx.state
        .availability
        .add_holiday("Bob/Ops", date(2024, 3, 6))
        .unwrap();
    ctx.state.setup.complete("Ward 7").unwrap();

    // Act
    let reopened = ctx.reopen();

    // Assert
    assert_eq!(reopened.staff_roster.list().unwrap(), vec!["Alice", "Bob/Ops"]);
    assert_eq!(reopened.shift_patterns.list().unwrap().len(), 4);
    assert_eq!(
        reopened.engine.get_assignment(date(2024, 3, 5), ShiftId(2)).unwrap(),
        Assignee::Staff("Alice".to_string())
    );
    assert!(reopened.availability.is_on_holiday("Bob/Ops", date(2024, 3, 6)).unwrap());
    assert!(reopened.setup.status().unwrap().complete);
}

#[test]
fn test_corrupt_ledger_fails_closed() {
    let ctx = TestContext::on_disk();
    ctx.state
        .store
        .set_raw("shiftAssignments", r#"{"2024-3-5-1": 42}"#)
        .unwrap();

    let result = ctx.state.engine.get_assignment(date(2024, 3, 5), ShiftId(1));

    match result {
        Err(AppError::CorruptRecord { key, .. }) => assert_eq!(key, "shiftAssignments"),
        other => panic!("expected corrupt record, got {:?}", other),
    }
}

#[test]
fn test_corrupt_settings_are_confined_to_one_staff_member() {
    let ctx = TestContext::new().with_staff(&["Alice", "Bob"]);
    ctx.state.availability.add_holiday("Bob", date(2024, 3, 6)).unwrap();
    ctx.state
        .store
        .set_raw("staffSettings_Alice", "{\"holidays\": \"soon\"}")
        .unwrap();

    assert!(matches!(
        ctx.state.availability.get_settings("Alice"),
        Err(AppError::CorruptRecord { .. })
    ));
    assert!(ctx.state.availability.is_on_holiday("Bob", date(2024, 3, 6)).unwrap());
}

#[test]
fn test_init_store_creates_data_dir() {
    let dir = TempDir::new().unwrap();
    let data_dir = dir.path().join("nested").join("rota");

    let store: Store = init_store(&data_dir).unwrap();
    store.save("setupComplete", &true).unwrap();

    assert!(data_dir.is_dir());
    assert_eq!(store.load::<bool>("setupComplete").unwrap(), Some(true));
}

#[test]
fn test_overlong_names_are_rejected_before_touching_disk() {
    // Arrange
    let ctx = TestContext::on_disk();
    ctx.add_shift("Day", "09:00", "17:00");
    let long_name = "N".repeat(200);

    // Act
    let added = ctx.state.staff_roster.add(&long_name);
    let assigned = ctx.state.engine.assign(&long_name, date(2024, 3, 5), ShiftId(1));

    // Assert
    assert!(matches!(added, Err(AppError::InvalidName(_))));
    assert!(matches!(assigned, Err(AppError::InvalidName(_))));
    assert_eq!(
        ctx.state.availability.get_settings(&long_name).unwrap(),
        Default::default()
    );
    assert!(ctx.state.staff_roster.list().unwrap().is_empty());
}

#[test]
fn test_longest_accepted_name_round_trips_on_disk() {
    // Arrange
    let ctx = TestContext::on_disk();
    let name = "é".repeat(50);
    assert_eq!(name.len(), rota::database::repositories::staff::MAX_NAME_BYTES);

    // Act
    ctx.state.staff_roster.add(&name).unwrap();
    ctx.state.availability.add_holiday(&name, date(2024, 3, 5)).unwrap();

    // Assert
    let reopened = ctx.reopen();
    assert_eq!(reopened.staff_roster.list().unwrap(), vec![name.clone()]);
    assert!(reopened.availability.is_on_holiday(&name, date(2024, 3, 5)).unwrap());
}

#[test]
fn test_file_store_refuses_keys_too_long_for_a_file_name() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::open(dir.path()).unwrap();
    let key = format!("staffSettings_{}", "x".repeat(300));

    assert!(matches!(store.set(&key, "{}"), Err(AppError::Storage(_))));
    assert_eq!(store.get(&key).unwrap(), None);
    store.remove(&key).unwrap();
    assert!(store.keys().unwrap().is_empty());
}
