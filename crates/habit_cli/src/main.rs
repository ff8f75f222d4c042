//! Command-line front end for the habit tracker.
//!
//! # Responsibility
//! - Parse user commands and configuration (database path, logging).
//! - Resolve "today" from the local clock once and pass it into core calls.
//! - Format core results for the terminal.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use habit_core::db::open_db;
use habit_core::{
    default_log_level, init_logging, insert_sample_habits, parse_ledger_date, reset_database,
    HabitService, Periodicity, SqliteCalendarRepository, SqliteCompletionRepository,
    SqliteHabitRepository, StreakMap, StreakQuery,
};
use rusqlite::Connection;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "habit", version, about = "Track daily and weekly habits and their streaks")]
struct Cli {
    /// SQLite database file.
    #[arg(long, env = "HABIT_DB", default_value = "habits.sqlite3", global = true)]
    db: PathBuf,

    /// Absolute directory for rolling log files; logging is off when unset.
    #[arg(long, env = "HABIT_LOG_DIR", global = true)]
    log_dir: Option<String>,

    /// trace|debug|info|warn|error; defaults by build mode.
    #[arg(long, env = "HABIT_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a habit.
    Add {
        name: String,
        description: String,
        #[arg(long, value_enum, default_value_t = CadenceArg::Daily)]
        periodicity: CadenceArg,
    },
    /// List habits.
    List {
        #[arg(long, value_enum)]
        periodicity: Option<CadenceArg>,
    },
    /// Delete a habit and its history.
    Delete { name: String },
    /// Mark a habit as completed (or not) on a date.
    Mark {
        name: String,
        #[command(flatten)]
        date: DateArg,
        /// Clear the completion instead of setting it.
        #[arg(long)]
        undo: bool,
    },
    /// Show every habit's progress on one day.
    Day {
        #[command(flatten)]
        date: DateArg,
    },
    /// Show streaks.
    Streaks {
        #[command(subcommand)]
        kind: StreakCommand,
        /// Print JSON instead of text.
        #[arg(long, global = true)]
        json: bool,
    },
    /// Delete all data, optionally re-seeding the sample habits.
    Reset {
        #[arg(long)]
        sample: bool,
    },
}

#[derive(Debug, Subcommand)]
enum StreakCommand {
    /// Current streak of each habit.
    Current {
        #[command(flatten)]
        date: DateArg,
    },
    /// Longest streak each habit ever reached.
    Longest,
}

#[derive(Debug, Args)]
struct DateArg {
    /// Date as YYYY-MM-DD; defaults to today.
    #[arg(long, value_parser = parse_date_arg)]
    date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CadenceArg {
    Daily,
    Weekly,
}

impl From<CadenceArg> for Periodicity {
    fn from(value: CadenceArg) -> Self {
        match value {
            CadenceArg::Daily => Periodicity::Daily,
            CadenceArg::Weekly => Periodicity::Weekly,
        }
    }
}

fn parse_date_arg(value: &str) -> Result<NaiveDate, String> {
    parse_ledger_date(value).map_err(|err| err.to_string())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir)
            .map_err(anyhow::Error::msg)
            .context("failed to initialize logging")?;
    }

    let today = Local::now().date_naive();
    let conn = open_db(&cli.db)
        .with_context(|| format!("failed to open database `{}`", cli.db.display()))?;

    run(cli.command, &conn, today)
}

fn run(command: Command, conn: &Connection, today: NaiveDate) -> Result<()> {
    let service = HabitService::new(
        SqliteHabitRepository::try_new(conn)?,
        SqliteCalendarRepository::try_new(conn)?,
        SqliteCompletionRepository::try_new(conn)?,
    );

    match command {
        Command::Add {
            name,
            description,
            periodicity,
        } => {
            let created_at = Local::now().naive_local();
            let habit = service.add_habit(&name, &description, periodicity.into(), created_at)?;
            println!(
                "You have added the habit '{}'. This is a '{}' habit.",
                habit.name, habit.periodicity
            );
        }
        Command::List { periodicity } => {
            let habits = service.list_habits(periodicity.map(Periodicity::from))?;
            println!(
                "{:<31} {:<46} {:<12} {:<20}",
                "Habit name", "Description", "Periodicity", "Created"
            );
            println!("{}", "-".repeat(112));
            for habit in habits {
                println!(
                    "{:<31} {:<46} {:<12} {:<20}",
                    habit.name,
                    habit.description,
                    habit.periodicity,
                    habit.created_at_text()
                );
            }
        }
        Command::Delete { name } => {
            service.delete_habit(&name)?;
            println!("Deleted habit '{}'.", name.trim().to_lowercase());
        }
        Command::Mark { name, date, undo } => {
            let date = date.date.unwrap_or(today);
            service.set_progress(&name, date, !undo, today)?;
            println!("Habit progression updated for {date}.");
        }
        Command::Day { date } => {
            let date = date.date.unwrap_or(today);
            let progress = service.day_progress(date, today)?;
            println!("Date: {}", date.format("%A, %d %B %Y"));
            println!("{:<31} {:<10} {:<10}", "Habit name", "Cadence", "Completed");
            println!("{}", "-".repeat(53));
            for item in progress {
                println!(
                    "{:<31} {:<10} {:<10}",
                    item.habit_name,
                    item.periodicity,
                    u8::from(item.completed)
                );
            }
        }
        Command::Streaks { kind, json } => {
            service.refresh_ledger(today)?;
            let query = StreakQuery::new(
                SqliteHabitRepository::try_new(conn)?,
                SqliteCompletionRepository::try_new(conn)?,
            );
            match kind {
                StreakCommand::Current { date } => {
                    let streaks = query.current_streaks(date.date.unwrap_or(today))?;
                    print_streaks(&streaks, json, "current", "streak")?;
                }
                StreakCommand::Longest => {
                    let streaks = query.longest_streaks_ever()?;
                    print_streaks(&streaks, json, "longest", "streak ever")?;
                }
            }
        }
        Command::Reset { sample } => {
            reset_database(conn).context("failed to reset database")?;
            if sample {
                let created = insert_sample_habits(&SqliteHabitRepository::try_new(conn)?)?;
                println!("Database reset; inserted {created} sample habits.");
            } else {
                println!("Database reset.");
            }
        }
    }

    Ok(())
}

fn print_streaks(streaks: &StreakMap, json: bool, kind: &str, suffix: &str) -> Result<()> {
    if json {
        let items: Vec<_> = streaks.values().collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    for line in streak_lines(streaks, kind, suffix) {
        println!("{line}");
    }
    Ok(())
}

fn streak_lines(streaks: &StreakMap, kind: &str, suffix: &str) -> Vec<String> {
    streaks
        .values()
        .map(|streak| {
            format!(
                "Habit: {}, {kind} {} {suffix}: {}",
                streak.habit_name, streak.periodicity, streak.length
            )
        })
        .collect()
}
