//! Calendar materializer.
//!
//! # Responsibility
//! - Keep `calendar_dates` a contiguous run of days from the tracking epoch
//!   through a caller-supplied "today".
//!
//! # Invariants
//! - Dates are only ever appended; existing rows are never rewritten.
//! - Materialization is idempotent for the same `today`.

use super::{ensure_connection_ready, RepoResult};
use crate::model::completion::{format_ledger_date, parse_ledger_date};
use chrono::NaiveDate;
use log::info;
use rusqlite::{Connection, OptionalExtension, Transaction, TransactionBehavior};

/// First calendar day the tracker materializes.
pub fn calendar_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).expect("valid calendar epoch")
}

/// Repository interface for the materialized calendar.
pub trait CalendarRepository {
    /// Most recent materialized date, if any.
    fn latest_date(&self) -> RepoResult<Option<NaiveDate>>;
    /// Appends every missing date through `today`; returns rows inserted.
    fn materialize_through(&self, today: NaiveDate) -> RepoResult<u32>;
}

/// SQLite-backed calendar materializer.
pub struct SqliteCalendarRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCalendarRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl CalendarRepository for SqliteCalendarRepository<'_> {
    fn latest_date(&self) -> RepoResult<Option<NaiveDate>> {
        let latest: Option<String> = self
            .conn
            .query_row("SELECT MAX(date) FROM calendar_dates;", [], |row| {
                row.get::<_, Option<String>>(0)
            })
            .optional()?
            .flatten();
        Ok(latest.as_deref().map(parse_ledger_date).transpose()?)
    }

    fn materialize_through(&self, today: NaiveDate) -> RepoResult<u32> {
        let first_missing = match self.latest_date()? {
            Some(latest) => match latest.succ_opt() {
                Some(next) => next,
                None => return Ok(0),
            },
            None => calendar_epoch(),
        };
        if first_missing > today {
            return Ok(0);
        }

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let mut inserted = 0_u32;
        {
            let mut stmt = tx.prepare("INSERT OR IGNORE INTO calendar_dates (date) VALUES (?1);")?;
            for date in first_missing.iter_days().take_while(|date| *date <= today) {
                let changed = stmt.execute([format_ledger_date(date)])?;
                inserted = inserted.saturating_add(u32::try_from(changed).unwrap_or(u32::MAX));
            }
        }
        tx.commit()?;

        info!(
            "event=calendar_materialize module=repo status=ok from={} through={} inserted={}",
            first_missing, today, inserted
        );
        Ok(inserted)
    }
}
