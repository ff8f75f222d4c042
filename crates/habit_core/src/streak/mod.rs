//! Streak computation engine.
//!
//! # Responsibility
//! - Compute the current streak of a habit as of an explicit reference date.
//! - Compute the longest streak a habit ever reached.
//! - Dispatch on [`Periodicity`](crate::model::habit::Periodicity) between
//!   day-run and week-run strategies.
//!
//! # Invariants
//! - The engine only reads completion records; it never mutates the ledger.
//! - Strategies are pure: the same ordered input always yields the same length.
//! - Input is assumed gapless (one record per calendar day). A missing day
//!   breaks daily contiguity and is simply absent from its week bucket.

pub mod daily;
pub mod query;
pub mod source;
pub mod weekly;

pub use daily::{current_daily_streak, longest_daily_streak, DailyFold};
pub use query::{HabitStreak, StreakMap, StreakQuery, StreakQueryError};
pub use source::{CompletionReader, HabitEnumerator, ReadOrder};
pub use weekly::{current_weekly_streak, longest_weekly_streak, week_start, WeekFold};
