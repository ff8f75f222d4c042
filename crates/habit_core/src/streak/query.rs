//! Streak query orchestration.
//!
//! # Responsibility
//! - Enumerate habits, read each history in the order its strategy expects,
//!   and aggregate per-habit results.
//!
//! # Invariants
//! - Current-streak reads are bounded by the explicit reference date.
//! - Longest-ever reads cover the full history and need no reference date.
//! - Habits are independent; one result entry per enumerated habit.

use super::daily::{current_daily_streak, longest_daily_streak};
use super::source::{CompletionReader, HabitEnumerator, ReadOrder};
use super::weekly::{current_weekly_streak, longest_weekly_streak};
use crate::model::completion::CompletionRecord;
use crate::model::habit::Periodicity;
use crate::repo::RepoError;
use chrono::NaiveDate;
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Streak length of one habit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitStreak {
    pub habit_name: String,
    pub periodicity: Periodicity,
    /// Days for daily habits, weeks for weekly habits.
    pub length: u32,
}

/// Results keyed by habit name.
pub type StreakMap = BTreeMap<String, HabitStreak>;

/// Errors from streak queries.
#[derive(Debug)]
pub enum StreakQueryError {
    /// Habit enumeration failed.
    Enumerate(RepoError),
    /// Reading one habit's history failed, including malformed ledger dates.
    Read {
        habit_name: String,
        source: RepoError,
    },
}

impl Display for StreakQueryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Enumerate(err) => write!(f, "failed to list habits: {err}"),
            Self::Read { habit_name, source } => {
                write!(f, "failed to read completions of `{habit_name}`: {source}")
            }
        }
    }
}

impl Error for StreakQueryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Enumerate(err) => Some(err),
            Self::Read { source, .. } => Some(source),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum StreakKind {
    Current(NaiveDate),
    Longest,
}

impl StreakKind {
    fn label(self) -> &'static str {
        match self {
            Self::Current(_) => "current",
            Self::Longest => "longest",
        }
    }
}

/// Read-only streak query over a habit enumerator and a completion reader.
pub struct StreakQuery<H, C> {
    habits: H,
    completions: C,
}

impl<H: HabitEnumerator, C: CompletionReader> StreakQuery<H, C> {
    pub fn new(habits: H, completions: C) -> Self {
        Self {
            habits,
            completions,
        }
    }

    /// Current streak of every habit as of `reference_date`.
    pub fn current_streaks(&self, reference_date: NaiveDate) -> Result<StreakMap, StreakQueryError> {
        self.collect(StreakKind::Current(reference_date))
    }

    /// Longest streak every habit ever reached.
    pub fn longest_streaks_ever(&self) -> Result<StreakMap, StreakQueryError> {
        self.collect(StreakKind::Longest)
    }

    fn collect(&self, kind: StreakKind) -> Result<StreakMap, StreakQueryError> {
        let started_at = Instant::now();
        let result = self
            .habits
            .list_periodicities()
            .map_err(StreakQueryError::Enumerate)
            .and_then(|habits| {
                habits
                    .into_iter()
                    .map(|(habit_name, periodicity)| -> Result<_, StreakQueryError> {
                        let length = self.streak_length(&habit_name, periodicity, kind)?;
                        debug!(
                            "event=streak_habit module=streak kind={} periodicity={} length={}",
                            kind.label(),
                            periodicity,
                            length
                        );
                        Ok((
                            habit_name.clone(),
                            HabitStreak {
                                habit_name,
                                periodicity,
                                length,
                            },
                        ))
                    })
                    .collect::<Result<StreakMap, StreakQueryError>>()
            });

        match &result {
            Ok(streaks) => info!(
                "event=streak_query module=streak status=ok kind={} habits={} duration_ms={}",
                kind.label(),
                streaks.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=streak_query module=streak status=error kind={} duration_ms={} error={}",
                kind.label(),
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }

    fn streak_length(
        &self,
        habit_name: &str,
        periodicity: Periodicity,
        kind: StreakKind,
    ) -> Result<u32, StreakQueryError> {
        let length = match (kind, periodicity) {
            (StreakKind::Current(today), Periodicity::Daily) => {
                let records = self.read(habit_name, ReadOrder::Descending, Some(today))?;
                current_daily_streak(&records, today)
            }
            (StreakKind::Current(today), Periodicity::Weekly) => {
                let records = self.read(habit_name, ReadOrder::Ascending, Some(today))?;
                current_weekly_streak(&records, today)
            }
            (StreakKind::Longest, Periodicity::Daily) => {
                longest_daily_streak(&self.read(habit_name, ReadOrder::Ascending, None)?)
            }
            (StreakKind::Longest, Periodicity::Weekly) => {
                longest_weekly_streak(&self.read(habit_name, ReadOrder::Ascending, None)?)
            }
        };
        Ok(length)
    }

    fn read(
        &self,
        habit_name: &str,
        order: ReadOrder,
        up_to: Option<NaiveDate>,
    ) -> Result<Vec<CompletionRecord>, StreakQueryError> {
        self.completions
            .read_completions(habit_name, order, up_to)
            .map_err(|source| StreakQueryError::Read {
                habit_name: habit_name.to_string(),
                source,
            })
    }
}
