//! Completion ledger contracts and SQLite implementation.
//!
//! # Responsibility
//! - Keep one completed/not-completed row per (habit, calendar date).
//! - Flip completion flags on user request.
//! - Serve ordered per-habit reads to the streak engine.
//!
//! # Invariants
//! - New rows default to not completed.
//! - Ledger dates are validated on read; a malformed date aborts the read.
//! - Reads are ordered by date, which sorts correctly in `YYYY-MM-DD` form.

use super::habit_repo::parse_periodicity;
use super::{bool_to_int, ensure_connection_ready, int_to_bool, RepoError, RepoResult};
use crate::model::completion::{format_ledger_date, CompletionRecord};
use crate::model::habit::Periodicity;
use crate::streak::source::{CompletionReader, ReadOrder};
use chrono::NaiveDate;
use log::info;
use rusqlite::{params, Connection, OptionalExtension};

/// One habit's completion flag on a single day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayProgress {
    pub habit_name: String,
    pub periodicity: Periodicity,
    pub completed: bool,
}

/// Repository interface for the completion ledger.
pub trait CompletionRepository {
    /// Inserts a not-completed row for every missing (habit, calendar date)
    /// pair; returns rows inserted.
    fn sync_with_calendar(&self) -> RepoResult<u32>;
    /// Sets the flag of one existing ledger row.
    fn set_completed(&self, habit_name: &str, date: NaiveDate, completed: bool) -> RepoResult<()>;
    /// Lists every habit's flag on `date`, ordered by habit name.
    fn list_day(&self, date: NaiveDate) -> RepoResult<Vec<DayProgress>>;
}

/// SQLite-backed completion ledger.
pub struct SqliteCompletionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCompletionRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl CompletionRepository for SqliteCompletionRepository<'_> {
    fn sync_with_calendar(&self) -> RepoResult<u32> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO completions (habit_name, date, completed)
             SELECT h.name, d.date, 0
             FROM habits h
             CROSS JOIN calendar_dates d;",
            [],
        )?;
        let inserted = u32::try_from(inserted).unwrap_or(u32::MAX);
        if inserted > 0 {
            info!("event=ledger_sync module=repo status=ok inserted={inserted}");
        }
        Ok(inserted)
    }

    fn set_completed(&self, habit_name: &str, date: NaiveDate, completed: bool) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE completions
             SET completed = ?3
             WHERE habit_name = ?1 AND date = ?2;",
            params![habit_name, format_ledger_date(date), bool_to_int(completed)],
        )?;
        if changed > 0 {
            return Ok(());
        }

        let habit_exists = self
            .conn
            .query_row("SELECT 1 FROM habits WHERE name = ?1;", [habit_name], |_| Ok(()))
            .optional()?
            .is_some();
        if habit_exists {
            Err(RepoError::CompletionNotFound {
                habit_name: habit_name.to_string(),
                date,
            })
        } else {
            Err(RepoError::HabitNotFound(habit_name.to_string()))
        }
    }

    fn list_day(&self, date: NaiveDate) -> RepoResult<Vec<DayProgress>> {
        let mut stmt = self.conn.prepare(
            "SELECT c.habit_name AS habit_name, h.periodicity AS periodicity, c.completed AS completed
             FROM completions c
             JOIN habits h ON h.name = c.habit_name
             WHERE c.date = ?1
             ORDER BY c.habit_name ASC;",
        )?;
        let mut rows = stmt.query([format_ledger_date(date)])?;

        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(DayProgress {
                habit_name: row.get("habit_name")?,
                periodicity: parse_periodicity(&row.get::<_, String>("periodicity")?)?,
                completed: int_to_bool(row.get("completed")?, "completions.completed")?,
            });
        }
        Ok(items)
    }
}

impl CompletionReader for SqliteCompletionRepository<'_> {
    fn read_completions(
        &self,
        habit_name: &str,
        order: ReadOrder,
        up_to: Option<NaiveDate>,
    ) -> RepoResult<Vec<CompletionRecord>> {
        let direction = match order {
            ReadOrder::Ascending => "ASC",
            ReadOrder::Descending => "DESC",
        };
        let mut stmt = self.conn.prepare(&format!(
            "SELECT date, completed
             FROM completions
             WHERE habit_name = ?1
               AND (?2 IS NULL OR date <= ?2)
             ORDER BY date {direction};"
        ))?;
        let mut rows = stmt.query(params![habit_name, up_to.map(format_ledger_date)])?;

        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            let date: String = row.get("date")?;
            let completed = int_to_bool(row.get("completed")?, "completions.completed")?;
            records.push(CompletionRecord::parse(&date, completed)?);
        }
        Ok(records)
    }
}
