use pretty_assertions::assert_eq;

use rota::AppError;
use rota::database::models::{Day, QuickHoliday, ShiftId};

mod common;
use common::{TestContext, date};

#[test]
fn test_missing_settings_read_as_defaults() {
    let ctx = TestContext::new();

    let settings = ctx.state.availability.get_settings("Nobody").unwrap();

    assert!(settings.holidays.is_empty());
    assert!(settings.day_preferences.is_empty());
    assert!(!ctx.state.availability.is_on_holiday("Nobody", date(2024, 1, 1)).unwrap());
}

#[test]
fn test_holiday_range_is_inclusive_and_idempotent() {
    // Arrange
    let ctx = TestContext::new().with_staff(&["Alice"]);

    // Act
    let first = ctx
        .state
        .availability
        .add_holiday_range("Alice", date(2024, 6, 10), date(2024, 6, 12))
        .unwrap();
    let second = ctx
        .state
        .availability
        .add_holiday_range("Alice", date(2024, 6, 10), date(2024, 6, 12))
        .unwrap();

    // Assert
    assert_eq!(first, 3);
    assert_eq!(second, 0);
    let holidays: Vec<_> = ctx
        .state
        .availability
        .get_settings("Alice")
        .unwrap()
        .holidays
        .into_iter()
        .collect();
    assert_eq!(holidays, vec![date(2024, 6, 10), date(2024, 6, 11), date(2024, 6, 12)]);
}

#[test]
fn test_overlapping_range_counts_only_new_dates() {
    let ctx = TestContext::new().with_staff(&["Alice"]);
    ctx.state.availability.add_holiday("Alice", date(2024, 6, 11)).unwrap();

    let added = ctx
        .state
        .availability
        .add_holiday_range("Alice", date(2024, 6, 10), date(2024, 6, 12))
        .unwrap();

    assert_eq!(added, 2);
}

#[test]
fn test_reversed_range_is_rejected() {
    let ctx = TestContext::new().with_staff(&["Alice"]);

    let result = ctx
        .state
        .availability
        .add_holiday_range("Alice", date(2024, 6, 12), date(2024, 6, 10));

    assert!(matches!(result, Err(AppError::InvalidRange { .. })));
    assert!(!ctx.state.availability.has_settings("Alice").unwrap());
}

#[test]
fn test_remove_holiday() {
    let ctx = TestContext::new().with_staff(&["Alice"]);
    ctx.state.availability.add_holiday("Alice", date(2024, 6, 10)).unwrap();

    assert!(ctx.state.availability.remove_holiday("Alice", date(2024, 6, 10)).unwrap());
    assert!(!ctx.state.availability.remove_holiday("Alice", date(2024, 6, 10)).unwrap());
    assert!(!ctx.state.availability.is_on_holiday("Alice", date(2024, 6, 10)).unwrap());
}

#[test]
fn test_holidays_grouped_by_month() {
    let ctx = TestContext::new().with_staff(&["Alice"]);
    ctx.state
        .availability
        .add_holiday_range("Alice", date(2024, 5, 30), date(2024, 6, 2))
        .unwrap();

    let grouped = ctx.state.availability.holidays_by_month("Alice").unwrap();

    assert_eq!(
        grouped.into_iter().collect::<Vec<_>>(),
        vec![
            ((2024, 5), vec![date(2024, 5, 30), date(2024, 5, 31)]),
            ((2024, 6), vec![date(2024, 6, 1), date(2024, 6, 2)]),
        ]
    );
}

#[test]
fn test_preference_upsert_follows_weekday() {
    // Arrange
    let ctx = TestContext::new().with_staff(&["Alice"]);
    // 2024-06-15 is a Saturday
    let saturday = date(2024, 6, 15);

    // Act & Assert
    ctx.state
        .availability
        .set_preference("Alice", ShiftId(3), Day::Sat, true)
        .unwrap();
    assert!(ctx.state.availability.is_preferred("Alice", ShiftId(3), saturday).unwrap());
    assert!(!ctx.state.availability.is_preferred("Alice", ShiftId(3), date(2024, 6, 16)).unwrap());

    ctx.state
        .availability
        .set_preference("Alice", ShiftId(3), Day::Sat, false)
        .unwrap();
    assert!(!ctx.state.availability.is_preferred("Alice", ShiftId(3), saturday).unwrap());
    assert_eq!(
        ctx.state.availability.get_settings("Alice").unwrap().day_preferences.len(),
        1
    );
}

#[test]
fn test_quick_holidays() {
    let ctx = TestContext::new().with_staff(&["Alice"]);
    // Wednesday
    let today = date(2024, 6, 12);

    let added = ctx
        .state
        .availability
        .add_quick_holiday("Alice", QuickHoliday::NextWeek, today)
        .unwrap();
    let weekend = ctx
        .state
        .availability
        .add_quick_holiday("Alice", QuickHoliday::ThisWeekend, today)
        .unwrap();

    assert_eq!(added, 7);
    // 15th and 16th, just before next week starts on the 17th
    assert_eq!(weekend, 2);
    let settings = ctx.state.availability.get_settings("Alice").unwrap();
    assert_eq!(settings.holidays.iter().next(), Some(&date(2024, 6, 15)));
    assert_eq!(settings.holidays.iter().last(), Some(&date(2024, 6, 23)));
}

#[test]
fn test_quick_holiday_kinds_parse_from_cli_names() {
    assert_eq!("weekend".parse::<QuickHoliday>().unwrap(), QuickHoliday::ThisWeekend);
    assert_eq!("next_week".parse::<QuickHoliday>().unwrap(), QuickHoliday::NextWeek);
    assert!("fortnight".parse::<QuickHoliday>().is_err());
}
