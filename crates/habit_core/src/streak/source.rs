//! Read capabilities the streak engine consumes.
//!
//! Implementations must return at most one record per date. They are not
//! required to be gapless, but streak results only match user intuition when
//! the ledger holds one row per calendar day.

use crate::model::completion::CompletionRecord;
use crate::model::habit::Periodicity;
use crate::repo::RepoResult;
use chrono::NaiveDate;

/// Date ordering of a completion read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOrder {
    /// Oldest first.
    Ascending,
    /// Most recent first.
    Descending,
}

/// Supplies the habits to compute streaks for.
pub trait HabitEnumerator {
    fn list_periodicities(&self) -> RepoResult<Vec<(String, Periodicity)>>;
}

/// Supplies one habit's ordered completion history.
pub trait CompletionReader {
    /// Reads records for `habit_name`, optionally bounded to dates `<= up_to`.
    fn read_completions(
        &self,
        habit_name: &str,
        order: ReadOrder,
        up_to: Option<NaiveDate>,
    ) -> RepoResult<Vec<CompletionRecord>>;
}
