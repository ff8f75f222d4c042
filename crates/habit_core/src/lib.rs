//! Core domain logic for the habit tracker.
//!
//! Habits, the materialized calendar and the completion ledger live in
//! SQLite; the streak engine in [`streak`] reads them through the
//! [`HabitEnumerator`] and [`CompletionReader`] traits only.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod streak;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::completion::{
    format_ledger_date, parse_ledger_date, CompletionRecord, LedgerDateError,
};
pub use model::habit::{Habit, HabitValidationError, Periodicity};
pub use repo::calendar_repo::{calendar_epoch, CalendarRepository, SqliteCalendarRepository};
pub use repo::completion_repo::{CompletionRepository, DayProgress, SqliteCompletionRepository};
pub use repo::habit_repo::{HabitRepository, SqliteHabitRepository};
pub use repo::{RepoError, RepoResult};
pub use service::habit_service::{
    HabitService, HabitServiceError, HabitServiceResult, LedgerRefresh,
};
pub use service::maintenance::{insert_sample_habits, reset_database};
pub use streak::{
    CompletionReader, HabitEnumerator, HabitStreak, ReadOrder, StreakMap, StreakQuery,
    StreakQueryError,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
