use pretty_assertions::assert_eq;

use rota::database::models::{BackupDocument, BackupField, Day, ShiftId};
use rota::services::BackupService;
use rota::{AppError, AppState};

mod common;
use common::{TestContext, date};

fn populated() -> TestContext {
    let ctx = TestContext::new()
        .with_standard_shifts()
        .with_staff(&["Alice", "Bob"]);
    ctx.assign("Alice", date(2024, 3, 5), 1);
    ctx.assign("Bob", date(2024, 3, 5), 2);
    ctx.state.engine.unassign(date(2024, 3, 6), ShiftId(4)).unwrap();
    ctx.state
        .availability
        .add_holiday_range("Alice", date(2024, 6, 10), date(2024, 6, 12))
        .unwrap();
    ctx.state
        .availability
        .set_preference("Bob", ShiftId(2), Day::Fri, true)
        .unwrap();
    ctx.state.setup.complete("Ward 7").unwrap();
    ctx
}

fn snapshot(state: &AppState) -> BackupDocument {
    let mut document = state.backup.export().unwrap();
    document.timestamp = None;
    document
}

#[test]
fn test_export_contains_every_entity() {
    let ctx = populated();

    let json: serde_json::Value =
        serde_json::from_str(&ctx.state.backup.export_json(false).unwrap()).unwrap();

    assert_eq!(json["assignments"]["2024-3-5-1"], "Alice");
    assert_eq!(json["assignments"]["2024-3-6-4"], "unassigned");
    assert_eq!(json["staff"], serde_json::json!(["Alice", "Bob"]));
    assert_eq!(json["shiftPatterns"][1]["startTime"], "22:00");
    assert_eq!(json["userName"], "Ward 7");
    assert_eq!(json["setupComplete"], true);
    assert_eq!(
        json["staffSettings"]["Alice"]["holidays"],
        serde_json::json!(["2024-06-10", "2024-06-11", "2024-06-12"])
    );
    assert_eq!(json["staffSettings"]["Bob"]["dayPreferences"]["2_fri"], true);
    assert!(json["timestamp"].is_string());
}

#[test]
fn test_round_trip_into_empty_store() {
    // Arrange
    let source = populated();
    let json = source.state.backup.export_json(true).unwrap();
    let target = TestContext::new();

    // Act
    target.state.backup.import_json(&json).unwrap();

    // Assert
    assert_eq!(snapshot(&target.state), snapshot(&source.state));
    assert!(target.state.availability.is_on_holiday("Alice", date(2024, 6, 11)).unwrap());
}

#[test]
fn test_import_is_idempotent() {
    let source = populated();
    let document = source.state.backup.export().unwrap();
    let target = TestContext::new();

    target.state.backup.import(&document).unwrap();
    let once = snapshot(&target.state);
    target.state.backup.import(&document).unwrap();

    assert_eq!(snapshot(&target.state), once);
}

#[test]
fn test_import_replaces_wholesale() {
    // Arrange
    let target = populated();
    target.state.staff_roster.add("Carol").unwrap();
    target.state.availability.add_holiday("Carol", date(2024, 1, 1)).unwrap();
    let document = BackupService::parse(
        r#"{"assignments":{"2024-3-7-1":"Dan"},"staff":["Dan"],"staffSettings":{}}"#,
    )
    .unwrap();

    // Act
    let report = target.state.backup.import(&document).unwrap();

    // Assert
    assert_eq!(target.state.staff_roster.list().unwrap(), vec!["Dan"]);
    assert_eq!(target.state.backup.export().unwrap().assignments.unwrap().len(), 1);
    assert!(!target.state.availability.has_settings("Carol").unwrap());
    assert!(!target.state.availability.has_settings("Alice").unwrap());
    assert!(report.applied(BackupField::Staff));
    assert!(report.missing.contains(&BackupField::ShiftPatterns));
}

#[test]
fn test_missing_fields_leave_state_untouched() {
    // Arrange
    let target = populated();
    let patterns_before = target.state.shift_patterns.list().unwrap();
    let document =
        BackupService::parse(r#"{"assignments":{},"staff":["Alice","Bob"],"shiftPatterns":[],"userName":""}"#)
            .unwrap();

    // Act
    target.state.backup.import(&document).unwrap();

    // Assert
    assert_eq!(target.state.shift_patterns.list().unwrap(), patterns_before);
    assert_eq!(target.state.settings.user_name().unwrap().as_deref(), Some("Ward 7"));
    assert!(target.state.settings.setup_complete().unwrap());
    assert!(target.state.availability.has_settings("Alice").unwrap());
    assert!(target.state.backup.export().unwrap().assignments.unwrap().is_empty());
}

#[test]
fn test_strict_import_requires_assignments_and_staff() {
    let target = populated();
    let before = snapshot(&target.state);

    for json in [
        r#"{"staff":["Zed"]}"#,
        r#"{"assignments":{}}"#,
        r#"{"shiftPatterns":[{"id":1,"name":"X","startTime":"01:00","endTime":"02:00"}]}"#,
    ] {
        let result = target.state.backup.import_json(json);
        assert!(
            matches!(result, Err(AppError::InvalidBackupFormat(_))),
            "{} should be rejected",
            json
        );
    }
    assert_eq!(snapshot(&target.state), before);
}

#[test]
fn test_malformed_documents_abort_without_partial_writes() {
    let target = populated();
    let before = snapshot(&target.state);
    let overlong = format!(r#"{{"assignments":{{}},"staff":["{}"]}}"#, "N".repeat(101));
    let overlong_settings = format!(
        r#"{{"assignments":{{}},"staff":[],"staffSettings":{{"{}":{{}}}}}}"#,
        "N".repeat(300)
    );

    for json in [
        "not json",
        r#"{"assignments":{"2024-13-40-1":"Alice"},"staff":[]}"#,
        r#"{"assignments":{},"staff":[""]}"#,
        r#"{"assignments":{},"staff":["Alice","alice"]}"#,
        r#"{"assignments":{},"staff":[" Bob "]}"#,
        r#"{"assignments":{},"staff":["UNASSIGNED"]}"#,
        overlong.as_str(),
        overlong_settings.as_str(),
        r#"{"assignments":{},"staff":[],"shiftPatterns":[{"id":1,"name":"A","startTime":"09:00","endTime":"17:00"},{"id":1,"name":"B","startTime":"09:00","endTime":"17:00"}]}"#,
        r#"{"assignments":{},"staff":[],"staffSettings":{"Alice":{"dayPreferences":{"1-mon":true}}}}"#,
    ] {
        assert!(
            matches!(
                target.state.backup.import_json(json),
                Err(AppError::InvalidBackupFormat(_))
            ),
            "{} should be rejected",
            json
        );
    }
    assert_eq!(snapshot(&target.state), before);
}

#[test]
fn test_partial_import_applies_what_is_present() {
    // Arrange
    let target = TestContext::new();
    let document = BackupService::parse(
        r#"{"shiftPatterns":[{"id":7,"name":"Day","startTime":"09:00","endTime":"17:00"}],"userName":"Clinic","staff":[]}"#,
    )
    .unwrap();

    // Act
    let report = target.state.backup.import_partial(&document).unwrap();

    // Assert
    assert_eq!(
        report.applied,
        vec![BackupField::ShiftPatterns, BackupField::UserName]
    );
    assert_eq!(
        report.missing,
        vec![
            BackupField::Staff,
            BackupField::Assignments,
            BackupField::SetupComplete,
            BackupField::StaffSettings
        ]
    );
    assert_eq!(target.state.shift_patterns.list().unwrap()[0].id, ShiftId(7));
    // new patterns continue after the imported ids
    assert_eq!(target.add_shift("Late", "14:00", "22:00").id, ShiftId(8));
}

#[test]
fn test_backup_file_name_uses_cleaned_user_name() {
    let ctx = populated();

    assert_eq!(
        ctx.state.backup.backup_file_name(date(2024, 3, 5)).unwrap(),
        "rota_backup_ward7_2024-03-05.json"
    );
}
