use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]").expect("valid regex"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Lowercase with everything except ASCII letters and digits removed.
pub fn clean_user_name(name: &str) -> String {
    NON_ALPHANUMERIC
        .replace_all(&name.to_lowercase(), "")
        .into_owned()
}

/// `rota_backup[_<user>]_<YYYY-MM-DD>.json`
pub fn backup(user_name: Option<&str>, today: NaiveDate) -> String {
    let user_part = user_name
        .map(clean_user_name)
        .map(|name| format!("_{}", name))
        .unwrap_or_default();
    format!("rota_backup{}_{}.json", user_part, today.format("%Y-%m-%d"))
}

/// `<staff_with_underscores>_shifts_<user|rota>.ics`
pub fn ics(staff: &str, user_name: Option<&str>) -> String {
    format!(
        "{}_shifts_{}.ics",
        WHITESPACE.replace_all(staff, "_"),
        clean_user_name(user_name.unwrap_or("rota"))
    )
}

/// `<Month>_<year>_schedule.txt`
pub fn roster(year: i32, month: u32) -> Option<String> {
    let name = MONTH_NAMES.get(month.checked_sub(1)? as usize)?;
    Some(format!("{}_{}_schedule.txt", name, year))
}
