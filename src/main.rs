use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use std::fs;
use std::path::Path;

use rota::database::models::{AvailabilityClass, ShiftPatternInput, SlotKey};
use rota::services::BackupService;
use rota::{AppState, Config};

mod cli;

use cli::{BackupCommand, Cli, Commands, HolidayCommand, SetupCommand, ShiftsCommand, StaffCommand};

fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    log::debug!(
        "Configuration loaded (environment: {}, data dir: {})",
        config.environment,
        config.data_dir.display()
    );

    let state = AppState::from_config(config)?;
    if state.setup.reconcile()? {
        println!("⚠️  No shift patterns defined. Run `rota setup complete` after adding shifts.");
    }

    run(&state, cli.command)
}

fn run(state: &AppState, command: Commands) -> Result<()> {
    let today = Local::now().date_naive();

    match command {
        Commands::Staff(command) => run_staff(state, command)?,
        Commands::Shifts(command) => run_shifts(state, command)?,
        Commands::Assign { staff, date, shift } => {
            state.engine.assign(&staff, date, shift)?;
            println!("✅ {} assigned to {} on {}", staff, state.shift_patterns.label(shift)?, date);
        }
        Commands::Unassign { date, shift } => {
            state.engine.unassign(date, shift)?;
            println!("✅ {} on {} is now unassigned", state.shift_patterns.label(shift)?, date);
        }
        Commands::Move {
            from_date,
            from_shift,
            to_date,
            to_shift,
        } => {
            let from = SlotKey::new(from_date, from_shift);
            let to = SlotKey::new(to_date, to_shift);
            match state.engine.move_assignment(from, to)? {
                Some(staff) => println!("✅ Moved {} from {} to {}", staff, from, to),
                None => println!("Nothing to move: {} is unassigned", from),
            }
        }
        Commands::Candidates { date, shift } => {
            println!("{} on {}:", state.shift_patterns.label(shift)?, date);
            for candidate in state.engine.rank_candidates(date, shift)? {
                let marker = match candidate.class {
                    AvailabilityClass::Preferred => "⭐",
                    AvailabilityClass::Normal => "  ",
                    AvailabilityClass::OnHoliday => "🏖️",
                };
                println!("  {} {} ({})", marker, candidate.staff, candidate.class);
            }
        }
        Commands::Holiday(command) => run_holiday(state, command, today)?,
        Commands::Prefer {
            staff,
            shift,
            day,
            off,
        } => {
            state.availability.set_preference(&staff, shift, day, !off)?;
            println!(
                "✅ {} {} prefer {} on {}",
                staff,
                if off { "no longer" } else { "now" },
                state.shift_patterns.label(shift)?,
                day
            );
        }
        Commands::Workload { year, month } => {
            for (staff, count) in state.engine.workload(year, month)? {
                println!("{:<24} {}", staff, count);
            }
        }
        Commands::Orphans => {
            let orphans = state.engine.orphaned_references()?;
            if orphans.is_empty() {
                println!("✅ No orphaned references");
            }
            for orphan in orphans {
                println!("⚠️  {}", orphan);
            }
        }
        Commands::Backup(command) => run_backup(state, command, today)?,
        Commands::Ics { staff, out } => {
            if !state.staff_roster.contains(&staff)? {
                anyhow::bail!("No staff member named {}", staff);
            }
            let ics = state.calendar.export_ics(&staff)?;
            let path = write_output(&out, &state.calendar.ics_file_name(&staff)?, &ics)?;
            println!("📅 Calendar written to {}", path.display());
        }
        Commands::Roster { year, month, out } => {
            let roster = state.calendar.export_month_roster(year, month)?;
            let path = write_output(&out, &state.calendar.roster_file_name(year, month)?, &roster)?;
            println!("📋 Roster written to {}", path.display());
        }
        Commands::Setup(SetupCommand::Status) => {
            let status = state.setup.status()?;
            println!(
                "Setup complete: {}",
                if status.complete { "yes" } else { "no" }
            );
            println!(
                "User name: {}",
                status.user_name.as_deref().unwrap_or("(not set)")
            );
            println!("Shift patterns: {}", status.shift_pattern_count);
            println!("Staff: {}", status.staff_count);
        }
        Commands::Setup(SetupCommand::Complete { user_name }) => {
            state.setup.complete(&user_name)?;
            println!("🎉 Setup complete. Welcome, {}!", user_name.trim());
        }
    }
    Ok(())
}

fn run_staff(state: &AppState, command: StaffCommand) -> Result<()> {
    match command {
        StaffCommand::List => {
            for name in state.staff_roster.list()? {
                println!("{}", name);
            }
        }
        StaffCommand::Add { name } => {
            let name = state.staff_roster.add(&name)?;
            println!("✅ Added {}", name);
        }
        StaffCommand::Remove { name } => {
            let removal = state.staff_roster.remove(&name)?;
            println!(
                "🗑️  Removed {} ({} shift(s) now unassigned)",
                removal.name,
                removal.released_slots.len()
            );
        }
        StaffCommand::Shifts { name } => {
            for assigned in state.engine.assignments_for(&name)? {
                println!(
                    "{} {}{}",
                    assigned.slot.date,
                    assigned.shift_label,
                    if assigned.orphaned { " (deleted)" } else { "" }
                );
            }
        }
    }
    Ok(())
}

fn run_shifts(state: &AppState, command: ShiftsCommand) -> Result<()> {
    match command {
        ShiftsCommand::List => {
            for pattern in state.shift_patterns.list()? {
                println!("{:>3}  {:<20} {}", pattern.id.0, pattern.name, pattern.time_range());
            }
        }
        ShiftsCommand::Add { name, start, end } => {
            let pattern = state
                .shift_patterns
                .add(ShiftPatternInput::parse(&name, &start, &end)?)?;
            println!("✅ Added shift {} '{}' ({})", pattern.id, pattern.name, pattern.time_range());
        }
        ShiftsCommand::Update {
            id,
            name,
            start,
            end,
        } => {
            let pattern = state
                .shift_patterns
                .update(id, ShiftPatternInput::parse(&name, &start, &end)?)?;
            println!("✅ Updated shift {} '{}' ({})", pattern.id, pattern.name, pattern.time_range());
        }
        ShiftsCommand::Remove { id } => {
            if state.shift_patterns.remove(id)? {
                println!("🗑️  Removed shift {}", id);
                state.setup.reconcile()?;
            } else {
                anyhow::bail!("No shift pattern with id {}", id);
            }
        }
    }
    Ok(())
}

fn run_holiday(state: &AppState, command: HolidayCommand, today: NaiveDate) -> Result<()> {
    match command {
        HolidayCommand::Add { staff, start, end } => {
            let added = state
                .availability
                .add_holiday_range(&staff, start, end.unwrap_or(start))?;
            println!("🏖️  Added {} holiday day(s) for {}", added, staff);
        }
        HolidayCommand::Remove { staff, date } => {
            if state.availability.remove_holiday(&staff, date)? {
                println!("✅ Removed holiday {} for {}", date, staff);
            } else {
                println!("{} has no holiday on {}", staff, date);
            }
        }
        HolidayCommand::List { staff } => {
            for ((year, month), dates) in state.availability.holidays_by_month(&staff)? {
                let days: Vec<String> = dates.iter().map(|d| d.format("%d").to_string()).collect();
                println!("{}-{:02}: {}", year, month, days.join(", "));
            }
        }
        HolidayCommand::Quick { staff, kind } => {
            let added = state.availability.add_quick_holiday(&staff, kind, today)?;
            println!("🏖️  Added {} holiday day(s) for {} ({})", added, staff, kind);
        }
    }
    Ok(())
}

fn run_backup(state: &AppState, command: BackupCommand, today: NaiveDate) -> Result<()> {
    match command {
        BackupCommand::Export { out } => {
            let json = state.backup.export_json(state.config.pretty_backups)?;
            let path = write_output(&out, &state.backup.backup_file_name(today)?, &json)?;
            println!("💾 Backup written to {}", path.display());
        }
        BackupCommand::Import { file, partial } => {
            let json = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let document = BackupService::parse(&json)?;
            let report = if partial {
                state.backup.import_partial(&document)?
            } else {
                state.backup.import(&document)?
            };
            println!(
                "✅ Restored {} staff, {} shift pattern(s), {} assignment(s)",
                report.staff_count, report.shift_pattern_count, report.assignment_count
            );
            for field in &report.missing {
                println!("   ⚠️  {} not in backup", field);
            }
            state.setup.reconcile()?;
        }
    }
    Ok(())
}

fn write_output(dir: &Path, file_name: &str, contents: &str) -> Result<std::path::PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    fs::write(&path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}
