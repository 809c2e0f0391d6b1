use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, Utc};

use crate::database::{
    models::{Assignee, ShiftPattern, SlotKey},
    repositories::{AssignmentRepository, SettingsRepository, ShiftPatternRepository},
};
use crate::error::{AppError, AppResult};
use crate::services::file_names::{self, MONTH_NAMES, clean_user_name};

const ICS_DATETIME: &str = "%Y%m%dT%H%M%SZ";
const ICS_ORGANIZER_MAILTO: &str = "mailto:noreply@example.com";
const UNASSIGNED_MARKER: &str = "❗unassigned ❗";

#[derive(Debug, Clone, PartialEq, Eq)]
struct CalendarEvent {
    start: String,
    end: String,
    summary: String,
    description: String,
}

impl CalendarEvent {
    /// Rolling 32-bit hash (multiplier 31) over the UTF-16 units of the event details.
    fn uid(&self, uid_domain: &str) -> String {
        let source = format!(
            "{}-{}-{}-{}",
            self.start, self.end, self.summary, self.description
        );
        let hash = source
            .encode_utf16()
            .fold(0i32, |hash, unit| {
                hash.wrapping_shl(5)
                    .wrapping_sub(hash)
                    .wrapping_add(i32::from(unit))
            });
        format!("{}@{}.calendar", hash, uid_domain)
    }
}

/// Read-only exports derived from the ledger and the catalog.
#[derive(Clone)]
pub struct CalendarExporter {
    assignments: AssignmentRepository,
    shift_patterns: ShiftPatternRepository,
    settings: SettingsRepository,
    default_organizer: String,
}

impl CalendarExporter {
    pub fn new(
        assignments: AssignmentRepository,
        shift_patterns: ShiftPatternRepository,
        settings: SettingsRepository,
        default_organizer: impl Into<String>,
    ) -> Self {
        Self {
            assignments,
            shift_patterns,
            settings,
            default_organizer: default_organizer.into(),
        }
    }

    pub fn export_ics(&self, staff: &str) -> AppResult<String> {
        self.export_ics_at(staff, Utc::now())
    }

    /// ICS calendar of every shift held by `staff`, stamped with `stamp`.
    ///
    /// Assignments whose shift pattern was deleted are skipped with a warning.
    pub fn export_ics_at(&self, staff: &str, stamp: DateTime<Utc>) -> AppResult<String> {
        let user_name = self.settings.user_name()?;
        let organizer = user_name
            .clone()
            .unwrap_or_else(|| self.default_organizer.clone());
        let uid_domain = clean_user_name(user_name.as_deref().unwrap_or("rota"));
        let patterns = self.shift_patterns.list()?;

        let mut events = Vec::new();
        for slot in self.assignments.slots_for(staff)? {
            let Some(pattern) = patterns.iter().find(|p| p.id == slot.shift_id) else {
                log::warn!(
                    "Shift pattern {} not found for assignment {}; skipping",
                    slot.shift_id,
                    slot
                );
                continue;
            };
            let (start, end) = shift_instants(pattern, slot.date);
            events.push(CalendarEvent {
                start: start.format(ICS_DATETIME).to_string(),
                end: end.format(ICS_DATETIME).to_string(),
                summary: pattern.name.clone(),
                description: format!("{}'s shift for {}", staff, organizer),
            });
        }
        log::debug!("Exporting {} event(s) for {}", events.len(), staff);

        let dtstamp = stamp.format(ICS_DATETIME).to_string();
        let mut lines = vec![
            "BEGIN:VCALENDAR".to_string(),
            "VERSION:2.0".to_string(),
            format!("PRODID:-//{} Rota//EN", escape_text(&organizer)),
            "CALSCALE:GREGORIAN".to_string(),
        ];
        for event in &events {
            lines.extend([
                "BEGIN:VEVENT".to_string(),
                format!("UID:{}", event.uid(&uid_domain)),
                format!("DTSTAMP:{}", dtstamp),
                format!("DTSTART:{}", event.start),
                format!("DTEND:{}", event.end),
                format!("SUMMARY:{}", escape_text(&event.summary)),
                format!("DESCRIPTION:{}", escape_text(&event.description)),
                format!(
                    "ORGANIZER;CN={}:{}",
                    escape_param(&organizer),
                    ICS_ORGANIZER_MAILTO
                ),
                "END:VEVENT".to_string(),
            ]);
        }
        lines.push("END:VCALENDAR".to_string());

        Ok(lines.join("\r\n"))
    }

    /// Plain-text roster for one month, one line per (day, shift pattern).
    pub fn export_month_roster(&self, year: i32, month: u32) -> AppResult<String> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| AppError::InvalidDate(format!("{}-{}", year, month)))?;
        let month_name = MONTH_NAMES[first.month0() as usize];
        let patterns = self.shift_patterns.list()?;

        let mut content = format!("# {} {} Schedule\n\n", month_name, year);
        if patterns.is_empty() {
            content.push_str(
                "No shift patterns defined. Please set up shifts in the setup wizard.\n",
            );
            return Ok(content);
        }

        let ledger = self.assignments.ledger()?;
        for date in first.iter_days().take_while(|d| d.month() == month) {
            content.push_str(&format!("## {}{}\n", date.day(), day_suffix(date.day())));
            for pattern in &patterns {
                let assignee = ledger
                    .get(&SlotKey::new(date, pattern.id))
                    .cloned()
                    .unwrap_or_default();
                let shown = match &assignee {
                    Assignee::Staff(name) => name.as_str(),
                    Assignee::Unassigned => UNASSIGNED_MARKER,
                };
                content.push_str(&format!(
                    "- **{}** ({}): {}\n",
                    pattern.name,
                    pattern.time_range(),
                    shown
                ));
            }
            content.push('\n');
        }
        Ok(content)
    }

    pub fn ics_file_name(&self, staff: &str) -> AppResult<String> {
        Ok(file_names::ics(staff, self.settings.user_name()?.as_deref()))
    }

    pub fn roster_file_name(&self, year: i32, month: u32) -> AppResult<String> {
        file_names::roster(year, month)
            .ok_or_else(|| AppError::InvalidDate(format!("{}-{}", year, month)))
    }
}

/// UTC start and end of a shift worked on `date`; overnight shifts end the next day.
pub fn shift_instants(pattern: &ShiftPattern, date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let end_date = if pattern.crosses_midnight() {
        date.checked_add_days(Days::new(1)).unwrap_or(date)
    } else {
        date
    };
    (
        date.and_time(pattern.start_time),
        end_date.and_time(pattern.end_time),
    )
}

fn day_suffix(day: u32) -> &'static str {
    if (4..=20).contains(&day) {
        return "th";
    }
    match day % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

// RFC 5545 TEXT escaping; every line break style becomes a literal "\n"
fn escape_text(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace(';', "\\;")
        .replace(',', "\\,")
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\n', "\\n")
}

// Parameter values cannot contain DQUOTE or control characters at all.
fn escape_param(value: &str) -> String {
    let cleaned: String = value
        .chars()
        .map(|c| match c {
            '"' => '\'',
            c if c.is_control() => ' ',
            c => c,
        })
        .collect();
    if cleaned.contains([':', ';', ',']) {
        format!("\"{}\"", cleaned)
    } else {
        cleaned
    }
}
