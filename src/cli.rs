use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use rota::database::models::{Day, QuickHoliday, ShiftId};

#[derive(Debug, Parser)]
#[command(name = "rota")]
#[command(about = "Monthly staff rota: shifts, holidays and assignments", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage the staff roster
    #[command(subcommand)]
    Staff(StaffCommand),
    /// Manage the shift pattern catalog
    #[command(subcommand)]
    Shifts(ShiftsCommand),
    /// Assign a staff member to a shift on a date
    Assign {
        staff: String,
        date: NaiveDate,
        shift: ShiftId,
    },
    /// Clear a slot
    Unassign { date: NaiveDate, shift: ShiftId },
    /// Move a staff member between slots
    Move {
        from_date: NaiveDate,
        from_shift: ShiftId,
        to_date: NaiveDate,
        to_shift: ShiftId,
    },
    /// Rank staff for a slot by availability
    Candidates { date: NaiveDate, shift: ShiftId },
    /// Manage holidays
    #[command(subcommand)]
    Holiday(HolidayCommand),
    /// Set or clear a day-of-week shift preference
    Prefer {
        staff: String,
        shift: ShiftId,
        day: Day,
        /// Clear the preference instead of setting it
        #[arg(long)]
        off: bool,
    },
    /// Assignment counts per staff member for a month
    Workload { year: i32, month: u32 },
    /// List assignments pointing at deleted shift patterns
    Orphans,
    /// Export or restore a JSON backup
    #[command(subcommand)]
    Backup(BackupCommand),
    /// Write an ICS calendar for one staff member
    Ics {
        staff: String,
        /// Output directory
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },
    /// Write the plain-text roster for a month
    Roster {
        year: i32,
        month: u32,
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },
    /// First-run setup
    #[command(subcommand)]
    Setup(SetupCommand),
}

#[derive(Debug, Subcommand)]
pub enum StaffCommand {
    List,
    Add { name: String },
    Remove { name: String },
    /// Slots held by a staff member
    Shifts { name: String },
}

#[derive(Debug, Subcommand)]
pub enum ShiftsCommand {
    List,
    Add {
        name: String,
        /// Start time, HH:MM
        start: String,
        /// End time, HH:MM
        end: String,
    },
    Update {
        id: ShiftId,
        name: String,
        start: String,
        end: String,
    },
    Remove { id: ShiftId },
}

#[derive(Debug, Subcommand)]
pub enum HolidayCommand {
    /// Add a single date or an inclusive range
    Add {
        staff: String,
        start: NaiveDate,
        end: Option<NaiveDate>,
    },
    Remove { staff: String, date: NaiveDate },
    List { staff: String },
    /// today, tomorrow, weekend or next_week
    Quick { staff: String, kind: QuickHoliday },
}

#[derive(Debug, Subcommand)]
pub enum BackupCommand {
    Export {
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },
    Import {
        file: PathBuf,
        /// Apply whatever fields are present instead of requiring assignments and staff
        #[arg(long)]
        partial: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum SetupCommand {
    Status,
    Complete { user_name: String },
}
