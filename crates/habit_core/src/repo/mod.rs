//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for habits, the calendar
//!   and the completion ledger.
//! - Isolate SQLite query details from services and the streak engine.
//!
//! # Invariants
//! - Writes validate domain values before persistence.
//! - Reads reject invalid persisted state (bad dates, unknown periodicity)
//!   instead of masking it.
//! - Repositories only accept connections migrated to the latest schema.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::completion::LedgerDateError;
use crate::model::habit::HabitValidationError;
use chrono::NaiveDate;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod calendar_repo;
pub mod completion_repo;
pub mod habit_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Error shared by habit, calendar and completion repositories.
#[derive(Debug)]
pub enum RepoError {
    Validation(HabitValidationError),
    Db(DbError),
    /// Connection schema is not at the version this binary expects.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    HabitNotFound(String),
    DuplicateHabit(String),
    /// No ledger row exists for the pair; the calendar may not be
    /// materialized that far.
    CompletionNotFound {
        habit_name: String,
        date: NaiveDate,
    },
    /// A stored ledger date does not parse as `YYYY-MM-DD`.
    InvalidDate(LedgerDateError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "habit repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::HabitNotFound(name) => write!(f, "habit not found: {name}"),
            Self::DuplicateHabit(name) => write!(f, "habit already exists: {name}"),
            Self::CompletionNotFound { habit_name, date } => {
                write!(f, "no ledger entry for habit `{habit_name}` on {date}")
            }
            Self::InvalidDate(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted habit data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidDate(err) => Some(err),
            Self::UninitializedConnection { .. } => None,
            Self::HabitNotFound(_) => None,
            Self::DuplicateHabit(_) => None,
            Self::CompletionNotFound { .. } => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<HabitValidationError> for RepoError {
    fn from(value: HabitValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<LedgerDateError> for RepoError {
    fn from(value: LedgerDateError) -> Self {
        Self::InvalidDate(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }
    Ok(())
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

fn int_to_bool(value: i64, column: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid flag value `{other}` in {column}"
        ))),
    }
}
