//! Database reset and sample data.
//!
//! # Responsibility
//! - Wipe all habit, calendar and ledger rows in one transaction.
//! - Seed the demo habits shipped with the tracker.

use crate::model::habit::{Habit, Periodicity, HABIT_TIMESTAMP_FORMAT};
use crate::repo::habit_repo::HabitRepository;
use crate::repo::{RepoError, RepoResult};
use chrono::NaiveDateTime;
use log::info;
use rusqlite::{Connection, Transaction, TransactionBehavior};

const SAMPLE_HABITS: &[(&str, &str, Periodicity, &str)] = &[
    (
        "lightsaber training",
        "single blade and double bladed",
        Periodicity::Daily,
        "2024-05-01 14:50",
    ),
    (
        "meditate",
        "meditate on the sith code",
        Periodicity::Daily,
        "2024-05-01 14:51",
    ),
    (
        "practice force lightning",
        "unlimited power",
        Periodicity::Weekly,
        "2024-05-01 14:52",
    ),
    (
        "attend senate",
        "boring but crucial",
        Periodicity::Weekly,
        "2024-05-01 14:53",
    ),
    (
        "wash robes",
        "be sure to use detergent for black fabric",
        Periodicity::Weekly,
        "2024-05-01 14:54",
    ),
];

/// Deletes every habit, calendar date and ledger row.
///
/// The schema itself is kept, so the connection stays usable.
pub fn reset_database(conn: &Connection) -> RepoResult<()> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    tx.execute_batch(
        "DELETE FROM completions;
         DELETE FROM habits;
         DELETE FROM calendar_dates;",
    )?;
    tx.commit()?;
    info!("event=db_reset module=service status=ok");
    Ok(())
}

/// Inserts the demo habits; returns how many were created.
pub fn insert_sample_habits<R: HabitRepository>(repo: &R) -> RepoResult<usize> {
    for (name, description, periodicity, created_at) in SAMPLE_HABITS {
        let created_at = NaiveDateTime::parse_from_str(created_at, HABIT_TIMESTAMP_FORMAT)
            .map_err(|err| RepoError::InvalidData(format!("sample timestamp: {err}")))?;
        let habit = Habit::new(name, description, *periodicity, created_at)?;
        repo.create_habit(&habit)?;
    }
    info!(
        "event=sample_seed module=service status=ok habits={}",
        SAMPLE_HABITS.len()
    );
    Ok(SAMPLE_HABITS.len())
}
