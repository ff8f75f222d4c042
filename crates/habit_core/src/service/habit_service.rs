//! Habit use-case service.
//!
//! # Responsibility
//! - Validate habit input before it reaches the registry.
//! - Keep the calendar and ledger materialized before progress is read or
//!   written.
//!
//! # Invariants
//! - "Today" is always an explicit argument; the service reads no clock.
//! - Progress can only be recorded for dates between the calendar epoch and
//!   today, inclusive.

use crate::model::habit::{normalize_habit_name, Habit, HabitValidationError, Periodicity};
use crate::repo::calendar_repo::{calendar_epoch, CalendarRepository};
use crate::repo::completion_repo::{CompletionRepository, DayProgress};
use crate::repo::habit_repo::HabitRepository;
use crate::repo::RepoError;
use chrono::{NaiveDate, NaiveDateTime};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for habit use-cases.
#[derive(Debug)]
pub enum HabitServiceError {
    /// Name or description failed validation.
    InvalidHabit(HabitValidationError),
    HabitNotFound(String),
    DuplicateHabit(String),
    /// Requested date lies outside the tracked calendar.
    DateOutOfRange {
        date: NaiveDate,
        earliest: NaiveDate,
        latest: NaiveDate,
    },
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for HabitServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidHabit(err) => write!(f, "{err}"),
            Self::HabitNotFound(name) => write!(f, "habit not found: {name}"),
            Self::DuplicateHabit(name) => write!(f, "habit already exists: {name}"),
            Self::DateOutOfRange {
                date,
                earliest,
                latest,
            } => write!(f, "date {date} is outside the tracked range {earliest}..={latest}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for HabitServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidHabit(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<HabitValidationError> for HabitServiceError {
    fn from(value: HabitValidationError) -> Self {
        Self::InvalidHabit(value)
    }
}

impl From<RepoError> for HabitServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::InvalidHabit(err),
            RepoError::HabitNotFound(name) => Self::HabitNotFound(name),
            RepoError::DuplicateHabit(name) => Self::DuplicateHabit(name),
            other => Self::Repo(other),
        }
    }
}

pub type HabitServiceResult<T> = Result<T, HabitServiceError>;

/// Rows added by one ledger refresh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerRefresh {
    pub dates_added: u32,
    pub entries_added: u32,
}

/// Habit service facade over registry, calendar and ledger repositories.
pub struct HabitService<H, C, L> {
    habits: H,
    calendar: C,
    ledger: L,
}

impl<H, C, L> HabitService<H, C, L>
where
    H: HabitRepository,
    C: CalendarRepository,
    L: CompletionRepository,
{
    pub fn new(habits: H, calendar: C, ledger: L) -> Self {
        Self {
            habits,
            calendar,
            ledger,
        }
    }

    /// Creates one habit stamped with `created_at`.
    pub fn add_habit(
        &self,
        name: &str,
        description: &str,
        periodicity: Periodicity,
        created_at: NaiveDateTime,
    ) -> HabitServiceResult<Habit> {
        let habit = Habit::new(name, description, periodicity, created_at)?;
        self.habits.create_habit(&habit)?;
        info!(
            "event=habit_create module=service status=ok periodicity={}",
            habit.periodicity
        );
        Ok(habit)
    }

    /// Deletes one habit and its whole completion history.
    pub fn delete_habit(&self, name: &str) -> HabitServiceResult<()> {
        let name = normalize_habit_name(name)?;
        self.habits.delete_habit(&name)?;
        info!("event=habit_delete module=service status=ok");
        Ok(())
    }

    pub fn get_habit(&self, name: &str) -> HabitServiceResult<Habit> {
        let name = normalize_habit_name(name)?;
        self.habits
            .get_habit(&name)?
            .ok_or(HabitServiceError::HabitNotFound(name))
    }

    /// Lists habits ordered by name, optionally of one periodicity.
    pub fn list_habits(&self, periodicity: Option<Periodicity>) -> HabitServiceResult<Vec<Habit>> {
        Ok(self.habits.list_habits(periodicity)?)
    }

    /// Materializes the calendar through `today` and fills missing ledger rows.
    pub fn refresh_ledger(&self, today: NaiveDate) -> HabitServiceResult<LedgerRefresh> {
        let refresh = LedgerRefresh {
            dates_added: self.calendar.materialize_through(today)?,
            entries_added: self.ledger.sync_with_calendar()?,
        };
        Ok(refresh)
    }

    /// Records whether `name` was completed on `date`.
    pub fn set_progress(
        &self,
        name: &str,
        date: NaiveDate,
        completed: bool,
        today: NaiveDate,
    ) -> HabitServiceResult<()> {
        let name = normalize_habit_name(name)?;
        ensure_tracked(date, today)?;
        self.refresh_ledger(today)?;
        self.ledger.set_completed(&name, date, completed)?;
        info!("event=progress_update module=service status=ok date={date} completed={completed}");
        Ok(())
    }

    /// Every habit's completion flag on `date`.
    pub fn day_progress(
        &self,
        date: NaiveDate,
        today: NaiveDate,
    ) -> HabitServiceResult<Vec<DayProgress>> {
        ensure_tracked(date, today)?;
        self.refresh_ledger(today)?;
        Ok(self.ledger.list_day(date)?)
    }
}

fn ensure_tracked(date: NaiveDate, today: NaiveDate) -> HabitServiceResult<()> {
    let earliest = calendar_epoch();
    if date < earliest || date > today {
        return Err(HabitServiceError::DateOutOfRange {
            date,
            earliest,
            latest: today,
        });
    }
    Ok(())
}
